use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnrichmentError {
    #[error("Raw dataset contains no rows")]
    EmptyDataset,

    #[error("Duplicate record for location '{location}' on {date}")]
    DuplicateKey { location: String, date: NaiveDate },

    #[error("Series for location '{location}' jumps from {previous} to {next}")]
    NonContiguous {
        location: String,
        previous: NaiveDate,
        next: NaiveDate,
    },
}
