use crate::acquisition::error::AcquisitionError;
use crate::acquisition::response::{ArchiveErrorBody, ArchiveResponse};
use crate::acquisition::retry::RetryPolicy;
use crate::types::daily_variable::DailyVariable;
use crate::types::date_range::DateRange;
use crate::types::location::Location;
use crate::types::records::RawObservation;
use bon::bon;
use log::{debug, info, warn};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Open-Meteo historical archive.
///
/// Each call to [`ArchiveClient::fetch_daily`] requests the four daily variables
/// for one location over one range, retrying transient failures according to the
/// configured [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    http: Client,
    base_url: String,
    timezone: String,
    retry_policy: RetryPolicy,
}

#[bon]
impl ArchiveClient {
    /// Creates a client. Every argument is optional.
    ///
    /// * `.base_url(..)`: endpoint, defaults to [`ARCHIVE_URL`].
    /// * `.timezone(..)`: IANA timezone used to cut days, defaults to `Europe/Paris`.
    /// * `.timeout(..)`: per-request timeout, defaults to 30 seconds.
    /// * `.retry_policy(..)`: defaults to [`RetryPolicy::default`].
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::ClientBuild`] if the HTTP client cannot be created.
    #[builder]
    pub fn new(
        #[builder(into)] base_url: Option<String>,
        #[builder(into)] timezone: Option<String>,
        timeout: Option<Duration>,
        retry_policy: Option<RetryPolicy>,
    ) -> Result<Self, AcquisitionError> {
        let http = Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
            .build()
            .map_err(AcquisitionError::ClientBuild)?;
        Ok(Self {
            http,
            base_url: base_url.unwrap_or_else(|| ARCHIVE_URL.to_string()),
            timezone: timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            retry_policy: retry_policy.unwrap_or_default(),
        })
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Fetches one observation per day of `range` for `location`.
    ///
    /// # Errors
    ///
    /// Transient errors ([`AcquisitionError::NetworkFailure`], [`AcquisitionError::ServerError`],
    /// [`AcquisitionError::RateLimited`]) are only returned once the retry policy is
    /// exhausted. [`AcquisitionError::Rejected`] and [`AcquisitionError::MalformedResponse`]
    /// are returned on first occurrence.
    pub async fn fetch_daily(
        &self,
        location: &Location,
        range: DateRange,
    ) -> Result<Vec<RawObservation>, AcquisitionError> {
        info!(
            "Fetching daily archive data for {} ({})",
            location, range
        );
        let label = format!("Archive request for {}", location.name);
        let observations = self
            .retry_policy
            .run(&label, |_| self.fetch_once(location, range))
            .await?;
        info!(
            "Fetched {} daily rows for {}",
            observations.len(),
            location.name
        );
        Ok(observations)
    }

    async fn fetch_once(
        &self,
        location: &Location,
        range: DateRange,
    ) -> Result<Vec<RawObservation>, AcquisitionError> {
        let url = &self.base_url;
        let query = [
            ("latitude", location.coordinate.latitude().to_string()),
            ("longitude", location.coordinate.longitude().to_string()),
            ("start_date", range.start().format("%Y-%m-%d").to_string()),
            ("end_date", range.end().format("%Y-%m-%d").to_string()),
            ("daily", DailyVariable::query_value()),
            ("timezone", self.timezone.clone()),
        ];

        let response = self
            .http
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AcquisitionError::NetworkFailure {
                url: url.clone(),
                source: e,
            })?;

        let response = Self::check_status(url, response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| AcquisitionError::NetworkFailure {
                url: url.clone(),
                source: e,
            })?;
        debug!(
            "Received {} bytes from archive for {}",
            body.len(),
            location.name
        );

        ArchiveResponse::parse(&location.name, &body)?.into_observations(&location.name, range)
    }

    /// Maps non-success statuses onto the error taxonomy.
    async fn check_status(url: &str, response: Response) -> Result<Response, AcquisitionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            warn!("Rate limited by archive (retry-after: {:?})", retry_after);
            return Err(AcquisitionError::RateLimited {
                url: url.to_string(),
                retry_after,
            });
        }

        if status.is_server_error() {
            return Err(AcquisitionError::ServerError {
                url: url.to_string(),
                status,
            });
        }

        // 4xx: the archive usually explains itself in a small JSON body.
        let reason = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ArchiveErrorBody>(&body).ok())
            .filter(|body| body.error)
            .and_then(|body| body.reason);
        Err(AcquisitionError::Rejected {
            url: url.to_string(),
            status,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::location::LatLon;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn nice() -> Location {
        Location::new("Nice", LatLon(43.7102, 7.262))
    }

    fn two_days() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
        )
        .unwrap()
    }

    fn two_day_body() -> serde_json::Value {
        json!({
            "latitude": 43.7,
            "longitude": 7.25,
            "daily": {
                "time": ["2023-01-01", "2023-01-02"],
                "temperature_2m_max": [14.1, 13.0],
                "temperature_2m_min": [6.2, null],
                "precipitation_sum": [0.0, 3.2],
                "wind_speed_10m_max": [11.5, 20.3]
            }
        })
    }

    async fn client_for(server: &MockServer, attempts: u32) -> ArchiveClient {
        ArchiveClient::builder()
            .base_url(format!("{}/v1/archive", server.uri()))
            .retry_policy(RetryPolicy::immediate(attempts))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_daily_sends_expected_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("latitude", "43.7102"))
            .and(query_param("longitude", "7.262"))
            .and(query_param("start_date", "2023-01-01"))
            .and(query_param("end_date", "2023-01-02"))
            .and(query_param(
                "daily",
                "temperature_2m_max,temperature_2m_min,precipitation_sum,wind_speed_10m_max",
            ))
            .and(query_param("timezone", "Europe/Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(two_day_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 3).await;
        let observations = client.fetch_daily(&nice(), two_days()).await.unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].temp_max, Some(14.1));
        assert_eq!(observations[1].temp_min, None);
    }

    #[tokio::test]
    async fn test_rate_limit_then_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(two_day_body()))
            .mount(&server)
            .await;

        let client = client_for(&server, 3).await;
        let observations = client.fetch_daily(&nice(), two_days()).await.unwrap();
        assert_eq!(observations.len(), 2);
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let client = client_for(&server, 3).await;
        let err = client.fetch_daily(&nice(), two_days()).await.unwrap_err();
        assert!(matches!(err, AcquisitionError::ServerError { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_bad_request_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": true,
                "reason": "Parameter 'start_date' is out of allowed range"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 3).await;
        let err = client.fetch_daily(&nice(), two_days()).await.unwrap_err();
        match err {
            AcquisitionError::Rejected { status, reason, .. } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(
                    reason.as_deref(),
                    Some("Parameter 'start_date' is out of allowed range")
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_retryable_network_failure() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = ArchiveClient::builder()
            .base_url(format!("http://127.0.0.1:{port}/v1/archive"))
            .retry_policy(RetryPolicy::immediate(3))
            .build()
            .unwrap();

        let err = client.fetch_daily(&nice(), two_days()).await.unwrap_err();
        match &err {
            AcquisitionError::NetworkFailure { url, .. } => {
                assert_eq!(url, &format!("http://127.0.0.1:{port}/v1/archive"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_malformed_body_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"latitude": 43.7})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 3).await;
        let err = client.fetch_daily(&nice(), two_days()).await.unwrap_err();
        assert!(matches!(err, AcquisitionError::MalformedResponse { .. }));
    }
}
