use crate::acquisition::retry::{RetryDecision, Retryable};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {url}")]
    NetworkFailure {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Archive server error {status} for {url}")]
    ServerError { url: String, status: StatusCode },

    #[error("Rate limited by archive for {url}")]
    RateLimited {
        url: String,
        retry_after: Option<Duration>,
    },

    #[error("Archive rejected request {url} with status {status}{}", reason_suffix(.reason))]
    Rejected {
        url: String,
        status: StatusCode,
        reason: Option<String>,
    },

    #[error("Malformed archive response for '{location}': {message}")]
    MalformedResponse { location: String, message: String },
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

impl AcquisitionError {
    pub(crate) fn malformed(location: &str, message: impl Into<String>) -> Self {
        AcquisitionError::MalformedResponse {
            location: location.to_string(),
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.retry_decision() == RetryDecision::Retry
    }
}

impl Retryable for AcquisitionError {
    fn retry_decision(&self) -> RetryDecision {
        match self {
            AcquisitionError::NetworkFailure { .. }
            | AcquisitionError::ServerError { .. }
            | AcquisitionError::RateLimited { .. } => RetryDecision::Retry,
            AcquisitionError::ClientBuild(_)
            | AcquisitionError::Rejected { .. }
            | AcquisitionError::MalformedResponse { .. } => RetryDecision::NoRetry,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            AcquisitionError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
