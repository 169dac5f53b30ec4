mod config;
mod error;
mod filtering;
mod pipeline;
mod types;
mod utils;

pub mod acquisition;
pub mod dataset;
pub mod enrichment;

pub use config::PipelineConfig;
pub use error::{ClimateError, InvalidInput};
pub use pipeline::{ClimatePipeline, RunReport};

pub use acquisition::archive_client::ArchiveClient;
pub use acquisition::error::AcquisitionError;
pub use acquisition::retry::{RetryDecision, RetryPolicy, Retryable};
pub use acquisition::{acquire, AcquisitionReport, LocationFailure};

pub use dataset::error::DatasetError;
pub use dataset::processed_frame::ProcessedLazyFrame;
pub use dataset::schema::DatasetKind;

pub use enrichment::enricher::{enrich, EnrichedDataset};
pub use enrichment::error::EnrichmentError;

pub use filtering::ClimateFrameFilterExt;

pub use types::daily_variable::DailyVariable;
pub use types::date_range::{DatePeriod, DateRange, Month, Year};
pub use types::location::{LatLon, Location};
pub use types::records::{ProcessedRecord, RawObservation, YearlySummary};
pub use types::trend_window::TrendWindow;
