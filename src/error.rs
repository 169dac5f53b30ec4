use crate::acquisition::error::AcquisitionError;
use crate::acquisition::LocationFailure;
use crate::dataset::error::DatasetError;
use crate::enrichment::error::EnrichmentError;
use crate::types::date_range::DateRange;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error("Failed to build the archive HTTP client")]
    HttpClient(#[source] AcquisitionError),

    #[error("Acquisition failed for location '{location}' ({range})")]
    Acquisition {
        location: String,
        range: DateRange,
        #[source]
        source: AcquisitionError,
    },

    #[error("Acquisition failed for every requested location ({} failures)", .failures.len())]
    AllLocationsFailed { failures: Vec<LocationFailure> },

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),
}

/// Rejections raised before any network call is made.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("Start date {start} is after end date {end}")]
    EmptyDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Requested range starts on {start}, before the earliest archived day {earliest}")]
    BeforeArchive { start: NaiveDate, earliest: NaiveDate },

    #[error("Requested range ends on {end}, after today ({today})")]
    FutureEndDate { end: NaiveDate, today: NaiveDate },

    #[error("Unknown location '{0}'")]
    UnknownLocation(String),

    #[error("Location '{name}' has invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates { name: String, lat: f64, lon: f64 },

    #[error("Location '{0}' is listed more than once")]
    DuplicateLocation(String),

    #[error("No locations configured")]
    NoLocations,

    #[error("Trend window must cover at least one day")]
    ZeroTrendWindow,

    #[error("Invalid value '{value}' for {key}: {reason}")]
    ConfigValue {
        key: String,
        value: String,
        reason: String,
    },
}
