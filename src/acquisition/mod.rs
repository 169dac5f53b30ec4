//! Data acquisition: fetch one observation per (location, day) from the archive.

pub mod archive_client;
pub mod error;
pub mod response;
pub mod retry;

use crate::acquisition::archive_client::ArchiveClient;
use crate::acquisition::error::AcquisitionError;
use crate::error::ClimateError;
use crate::types::date_range::DateRange;
use crate::types::location::Location;
use crate::types::records::RawObservation;
use futures_util::stream::{self, StreamExt};
use log::{error, info};

/// A location whose fetch kept failing after every retry.
#[derive(Debug)]
pub struct LocationFailure {
    pub location: String,
    pub range: DateRange,
    pub error: AcquisitionError,
}

/// Outcome of fetching every configured location.
///
/// `observations` are grouped by location in request order, then by date.
#[derive(Debug, Default)]
pub struct AcquisitionReport {
    pub observations: Vec<RawObservation>,
    pub failures: Vec<LocationFailure>,
}

impl AcquisitionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetches `range` for every location, at most `concurrency` requests in flight.
///
/// All per-location results are collected before returning. A location whose
/// retries are exhausted is recorded in [`AcquisitionReport::failures`] and does
/// not affect the others.
///
/// # Errors
///
/// Returns [`ClimateError::Acquisition`] on the first non-retryable failure (a
/// rejected request or a malformed response), naming the location and range.
pub async fn acquire(
    client: &ArchiveClient,
    locations: &[Location],
    range: DateRange,
    concurrency: usize,
) -> Result<AcquisitionReport, ClimateError> {
    let results: Vec<(&Location, Result<Vec<RawObservation>, AcquisitionError>)> =
        stream::iter(locations)
            .map(|location| async move { (location, client.fetch_daily(location, range).await) })
            .buffered(concurrency.max(1))
            .collect()
            .await;

    let mut report = AcquisitionReport::default();
    for (location, result) in results {
        match result {
            Ok(observations) => report.observations.extend(observations),
            Err(e) if e.is_retryable() => {
                error!(
                    "Giving up on {} for {} after {} attempts: {}",
                    location.name,
                    range,
                    client.retry_policy().max_attempts(),
                    e
                );
                report.failures.push(LocationFailure {
                    location: location.name.clone(),
                    range,
                    error: e,
                });
            }
            Err(e) => {
                return Err(ClimateError::Acquisition {
                    location: location.name.clone(),
                    range,
                    source: e,
                })
            }
        }
    }

    info!(
        "Acquired {} rows for {} of {} locations",
        report.observations.len(),
        locations.len() - report.failures.len(),
        locations.len()
    );
    Ok(report)
}
