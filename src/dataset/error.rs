use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to create artifact directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Artifact '{0}' does not exist")]
    NotFound(PathBuf),

    // Raised inside the blocking writer task
    #[error("I/O error writing artifact '{0}'")]
    ArtifactWriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing artifact '{0}'")]
    ArtifactWritePolars(PathBuf, #[source] PolarsError),
    #[error("Failed to publish artifact '{0}'")]
    ArtifactPersist(PathBuf, #[source] tempfile::PersistError),

    #[error("Failed to read CSV artifact '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Row {row} has unparsable value '{value}' in column '{column}'")]
    MalformedValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row} has no value for key column '{column}'")]
    NullKey { row: usize, column: String },

    #[error("Row {row} has malformed date '{value}'")]
    MalformedDate { row: usize, value: String },

    #[error("Period does not resolve to a valid date range")]
    InvalidPeriod,

    #[error("Failed building DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
