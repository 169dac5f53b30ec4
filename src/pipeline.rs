//! Acquisition followed by enrichment, with artifacts on disk in between.

use crate::acquisition::archive_client::ArchiveClient;
use crate::acquisition::{acquire, AcquisitionReport, LocationFailure};
use crate::config::PipelineConfig;
use crate::dataset::artifact::{read_csv, write_csv, write_csv_set};
use crate::dataset::frames::{
    frame_to_observations, observations_to_frame, records_to_frame, summaries_to_frame,
};
use crate::dataset::schema::DatasetKind;
use crate::enrichment::enricher::{enrich, EnrichedDataset};
use crate::error::ClimateError;
use crate::types::date_range::DateRange;
use crate::types::location::Location;
use crate::types::records::RawObservation;
use crate::utils::{processed_artifact_path, raw_artifact_path, summary_artifact_path};
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// What a full run produced.
#[derive(Debug)]
pub struct RunReport {
    pub raw_path: PathBuf,
    pub processed_path: PathBuf,
    pub summary_path: PathBuf,
    /// Rows in the processed artifact.
    pub rows: usize,
    /// Rows in the yearly summary artifact.
    pub yearly_rows: usize,
    /// Locations whose fetch was abandoned after exhausting retries.
    pub failures: Vec<LocationFailure>,
    /// True when an existing raw artifact was used instead of downloading.
    pub reused_raw: bool,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the climate pipeline for one [`PipelineConfig`].
///
/// # Example
///
/// ```no_run
/// use paca_climate::{ClimatePipeline, PipelineConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = ClimatePipeline::new(PipelineConfig::from_env()?)?;
/// let report = pipeline.run().await?;
/// println!("{} rows written to {:?}", report.rows, report.processed_path);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClimatePipeline {
    config: PipelineConfig,
    client: ArchiveClient,
}

impl ClimatePipeline {
    /// Validates `config` and prepares the HTTP client. No request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::InvalidInput`] for an invalid configuration and
    /// [`ClimateError::HttpClient`] if the client cannot be built.
    pub fn new(config: PipelineConfig) -> Result<Self, ClimateError> {
        config.validate()?;
        let client = ArchiveClient::builder()
            .base_url(config.archive_url.clone())
            .timezone(config.timezone.clone())
            .timeout(config.request_timeout)
            .retry_policy(config.retry_policy.clone())
            .build()
            .map_err(ClimateError::HttpClient)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn raw_path(&self) -> PathBuf {
        raw_artifact_path(&self.config.data_dir, self.config.period)
    }

    pub fn processed_path(&self) -> PathBuf {
        processed_artifact_path(&self.config.data_dir, self.config.period)
    }

    pub fn summary_path(&self) -> PathBuf {
        summary_artifact_path(&self.config.data_dir, self.config.period)
    }

    /// Fetches every configured location and writes the raw artifact.
    ///
    /// Locations that exhausted their retries are listed in the report; their
    /// rows are absent from the artifact.
    ///
    /// # Errors
    ///
    /// [`ClimateError::AllLocationsFailed`] when no location succeeded, any
    /// non-retryable acquisition error, or an artifact write failure.
    pub async fn acquire(&self) -> Result<AcquisitionReport, ClimateError> {
        let report = acquire(
            &self.client,
            &self.config.locations,
            self.config.period,
            self.config.concurrency,
        )
        .await?;

        if report.failures.len() == self.config.locations.len() {
            return Err(ClimateError::AllLocationsFailed {
                failures: report.failures,
            });
        }

        let path = self.raw_path();
        write_csv(observations_to_frame(&report.observations)?, &path).await?;
        info!(
            "Raw dataset with {} rows saved to {:?}",
            report.observations.len(),
            path
        );
        Ok(report)
    }

    /// Loads a raw artifact, derives every indicator and writes the processed
    /// and yearly summary artifacts. Neither is published unless both are ready.
    ///
    /// # Errors
    ///
    /// Any unreadable or invalid raw dataset is fatal; nothing is written then.
    pub async fn enrich(&self, raw_path: &Path) -> Result<EnrichedDataset, ClimateError> {
        let observations = load_raw(raw_path).await?;
        info!(
            "Loaded {} raw rows from {:?}",
            observations.len(),
            raw_path
        );
        let dataset = enrich(observations, self.config.trend_window)?;

        let processed_path = self.processed_path();
        let summary_path = self.summary_path();
        write_csv_set(vec![
            (records_to_frame(&dataset.records)?, processed_path),
            (summaries_to_frame(&dataset.yearly)?, summary_path),
        ])
        .await?;
        Ok(dataset)
    }

    /// Acquisition then enrichment.
    ///
    /// An existing raw artifact is reused when `force_download` is off and it
    /// covers exactly the configured locations over the whole period.
    pub async fn run(&self) -> Result<RunReport, ClimateError> {
        let raw_path = self.raw_path();
        let reused_raw = !self.config.force_download && self.raw_is_reusable(&raw_path).await;

        let failures = if reused_raw {
            info!("Cache hit: reusing raw dataset at {:?}", raw_path);
            Vec::new()
        } else {
            if !self.config.force_download {
                warn!("Cache miss for raw dataset at {:?}. Downloading.", raw_path);
            }
            self.acquire().await?.failures
        };

        let dataset = self.enrich(&raw_path).await?;
        let report = RunReport {
            raw_path,
            processed_path: self.processed_path(),
            summary_path: self.summary_path(),
            rows: dataset.records.len(),
            yearly_rows: dataset.yearly.len(),
            failures,
            reused_raw,
        };
        info!(
            "Run finished: {} processed rows, {} yearly rows, {} failed locations",
            report.rows,
            report.yearly_rows,
            report.failures.len()
        );
        Ok(report)
    }

    async fn raw_is_reusable(&self, path: &Path) -> bool {
        if tokio::fs::metadata(path).await.is_err() {
            return false;
        }
        match load_raw(path).await {
            Ok(observations) => {
                let covered = covers(&observations, &self.config.locations, self.config.period);
                if !covered {
                    warn!(
                        "Raw dataset at {:?} does not cover every location over {}",
                        path, self.config.period
                    );
                }
                covered
            }
            Err(e) => {
                warn!("Ignoring unreadable raw dataset at {:?}: {}", path, e);
                false
            }
        }
    }
}

async fn load_raw(path: &Path) -> Result<Vec<RawObservation>, ClimateError> {
    let df = read_csv(path, DatasetKind::Raw).await?;
    Ok(frame_to_observations(&df)?)
}

/// True when `observations` hold every (location, day) pair exactly once and nothing else.
fn covers(observations: &[RawObservation], locations: &[Location], range: DateRange) -> bool {
    if observations.len() != locations.len() * range.num_days() {
        return false;
    }
    let mut days: HashMap<&str, HashSet<NaiveDate>> = HashMap::new();
    for observation in observations {
        if !range.contains(observation.date) {
            return false;
        }
        days.entry(observation.location.as_str())
            .or_default()
            .insert(observation.date);
    }
    days.len() == locations.len()
        && locations.iter().all(|location| {
            days.get(location.name.as_str())
                .is_some_and(|dates| dates.len() == range.num_days())
        })
}
