//! Open-Meteo archive payloads and their validation into [`RawObservation`]s.
//!
//! The archive is untrusted input: the series must line up day for day with the
//! requested range and every requested variable must be present before any value
//! is used. `null` entries inside a series are legitimate and become missing values.

use crate::acquisition::error::AcquisitionError;
use crate::types::daily_variable::DailyVariable;
use crate::types::date_range::DateRange;
use crate::types::records::RawObservation;
use chrono::NaiveDate;
use serde::Deserialize;

/// Top-level response from the archive endpoint.
#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub daily: Option<DailySeries>,
}

/// Body returned alongside 4xx statuses.
#[derive(Debug, Deserialize)]
pub struct ArchiveErrorBody {
    #[serde(default)]
    pub error: bool,
    pub reason: Option<String>,
}

/// Daily series, one entry per day, aligned with `time`.
#[derive(Debug, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Option<Vec<Option<f64>>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Option<Vec<Option<f64>>>,
    #[serde(rename = "precipitation_sum")]
    pub precipitation: Option<Vec<Option<f64>>>,
    #[serde(rename = "wind_speed_10m_max")]
    pub wind_speed_max: Option<Vec<Option<f64>>>,
}

impl DailySeries {
    fn variable(&self, variable: DailyVariable) -> Option<&[Option<f64>]> {
        let series = match variable {
            DailyVariable::TemperatureMax => &self.temperature_max,
            DailyVariable::TemperatureMin => &self.temperature_min,
            DailyVariable::PrecipitationSum => &self.precipitation,
            DailyVariable::WindSpeedMax => &self.wind_speed_max,
        };
        series.as_deref()
    }
}

impl ArchiveResponse {
    /// Parses a response body. Anything that is not the expected JSON shape is malformed.
    pub fn parse(location: &str, body: &str) -> Result<Self, AcquisitionError> {
        serde_json::from_str(body).map_err(|e| {
            AcquisitionError::malformed(location, format!("invalid JSON body: {e}"))
        })
    }

    /// Validates the payload against the requested range and converts it into one
    /// observation per day, in chronological order.
    pub fn into_observations(
        self,
        location: &str,
        range: DateRange,
    ) -> Result<Vec<RawObservation>, AcquisitionError> {
        let daily = self
            .daily
            .ok_or_else(|| AcquisitionError::malformed(location, "missing 'daily' block"))?;

        let expected = range.num_days();
        if daily.time.len() != expected {
            return Err(AcquisitionError::malformed(
                location,
                format!(
                    "expected {} days for {}, got {}",
                    expected,
                    range,
                    daily.time.len()
                ),
            ));
        }

        let temp_max = checked_series(&daily, DailyVariable::TemperatureMax, location, expected)?;
        let temp_min = checked_series(&daily, DailyVariable::TemperatureMin, location, expected)?;
        let precipitation =
            checked_series(&daily, DailyVariable::PrecipitationSum, location, expected)?;
        let wind = checked_series(&daily, DailyVariable::WindSpeedMax, location, expected)?;

        daily
            .time
            .iter()
            .zip(range.days())
            .enumerate()
            .map(|(i, (time, expected_date))| {
                let date = NaiveDate::parse_from_str(time, "%Y-%m-%d").map_err(|_| {
                    AcquisitionError::malformed(location, format!("unparsable date '{time}'"))
                })?;
                if date != expected_date {
                    return Err(AcquisitionError::malformed(
                        location,
                        format!("day {} is {}, expected {}", i, date, expected_date),
                    ));
                }
                Ok(RawObservation {
                    location: location.to_string(),
                    date,
                    temp_min: finite(temp_min[i]),
                    temp_max: finite(temp_max[i]),
                    precipitation: finite(precipitation[i]),
                    wind: finite(wind[i]),
                })
            })
            .collect()
    }
}

fn checked_series<'a>(
    daily: &'a DailySeries,
    variable: DailyVariable,
    location: &str,
    expected: usize,
) -> Result<&'a [Option<f64>], AcquisitionError> {
    let values = daily.variable(variable).ok_or_else(|| {
        AcquisitionError::malformed(location, format!("missing daily variable '{variable}'"))
    })?;
    if values.len() != expected {
        return Err(AcquisitionError::malformed(
            location,
            format!(
                "daily variable '{}' has {} values, expected {}",
                variable,
                values.len(),
                expected
            ),
        ));
    }
    Ok(values)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(start.parse().unwrap(), end.parse().unwrap()).unwrap()
    }

    fn body(value: serde_json::Value) -> String {
        value.to_string()
    }

    #[test]
    fn test_valid_response_with_nulls() {
        let payload = body(json!({
            "latitude": 43.3,
            "longitude": 5.375,
            "timezone": "Europe/Paris",
            "daily": {
                "time": ["2023-01-01", "2023-01-02"],
                "temperature_2m_max": [20.0, null],
                "temperature_2m_min": [10.0, 8.5],
                "precipitation_sum": [0.0, 12.4],
                "wind_speed_10m_max": [18.7, 25.1]
            }
        }));

        let observations = ArchiveResponse::parse("Marseille", &payload)
            .unwrap()
            .into_observations("Marseille", range("2023-01-01", "2023-01-02"))
            .unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].temp_max, Some(20.0));
        assert_eq!(observations[0].temp_min, Some(10.0));
        assert_eq!(observations[0].precipitation, Some(0.0));
        assert_eq!(observations[1].temp_max, None);
        assert!(observations[1].is_incomplete());
        assert!(observations.iter().all(|o| o.location == "Marseille"));
    }

    #[test]
    fn test_missing_daily_block() {
        let payload = body(json!({"latitude": 43.3, "longitude": 5.375}));
        let err = ArchiveResponse::parse("Nice", &payload)
            .unwrap()
            .into_observations("Nice", range("2023-01-01", "2023-01-01"))
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::MalformedResponse { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_series_length_mismatch() {
        let payload = body(json!({
            "daily": {
                "time": ["2023-01-01"],
                "temperature_2m_max": [20.0],
                "temperature_2m_min": [10.0],
                "precipitation_sum": [0.0],
                "wind_speed_10m_max": [18.7]
            }
        }));
        let err = ArchiveResponse::parse("Gap", &payload)
            .unwrap()
            .into_observations("Gap", range("2023-01-01", "2023-01-03"))
            .unwrap_err();
        assert!(err.to_string().contains("expected 3 days"));
    }

    #[test]
    fn test_missing_variable() {
        let payload = body(json!({
            "daily": {
                "time": ["2023-01-01"],
                "temperature_2m_max": [20.0],
                "temperature_2m_min": [10.0],
                "precipitation_sum": [0.0]
            }
        }));
        let err = ArchiveResponse::parse("Gap", &payload)
            .unwrap()
            .into_observations("Gap", range("2023-01-01", "2023-01-01"))
            .unwrap_err();
        assert!(err.to_string().contains("wind_speed_10m_max"));
    }

    #[test]
    fn test_date_mismatch() {
        let payload = body(json!({
            "daily": {
                "time": ["2023-01-02"],
                "temperature_2m_max": [20.0],
                "temperature_2m_min": [10.0],
                "precipitation_sum": [0.0],
                "wind_speed_10m_max": [18.7]
            }
        }));
        let err = ArchiveResponse::parse("Toulon", &payload)
            .unwrap()
            .into_observations("Toulon", range("2023-01-01", "2023-01-01"))
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::MalformedResponse { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let err = ArchiveResponse::parse("Avignon", "<html>oops</html>").unwrap_err();
        assert!(matches!(err, AcquisitionError::MalformedResponse { .. }));
    }
}
