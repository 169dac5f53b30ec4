//! Run configuration.

use crate::acquisition::archive_client::{ARCHIVE_URL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TIMEZONE};
use crate::acquisition::retry::RetryPolicy;
use crate::error::InvalidInput;
use crate::types::date_range::DateRange;
use crate::types::location::Location;
use crate::types::trend_window::TrendWindow;
use crate::utils::default_data_dir;
use bon::Builder;
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_START_DATE: &str = "2013-01-01";
pub const DEFAULT_END_DATE: &str = "2023-12-31";

/// Everything a pipeline run needs, passed explicitly to each stage.
///
/// # Examples
///
/// ```
/// use paca_climate::{DateRange, PipelineConfig, Year};
///
/// let config = PipelineConfig::builder()
///     .period(DateRange::from_period(Year(2020)).unwrap())
///     .data_dir("/tmp/paca")
///     .build();
/// assert_eq!(config.locations.len(), 6);
/// assert_eq!(config.trend_window.days(), 7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Builder)]
pub struct PipelineConfig {
    #[builder(default = Location::paca_region())]
    pub locations: Vec<Location>,
    pub period: DateRange,
    #[builder(into, default = default_data_dir())]
    pub data_dir: PathBuf,
    /// IANA timezone the provider uses to cut days.
    #[builder(into, default = DEFAULT_TIMEZONE.to_string())]
    pub timezone: String,
    #[builder(default)]
    pub trend_window: TrendWindow,
    #[builder(default)]
    pub retry_policy: RetryPolicy,
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
    /// Maximum number of locations fetched at once.
    #[builder(default = 1)]
    pub concurrency: usize,
    /// Re-download even when a matching raw artifact exists.
    #[builder(default)]
    pub force_download: bool,
    #[builder(into, default = ARCHIVE_URL.to_string())]
    pub archive_url: String,
}

impl PipelineConfig {
    /// Checks the configuration before any network call.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvalidInput`] found: no locations, an invalid or
    /// duplicated location, a range outside the archive (before its first day or
    /// ending after today), or a zero concurrency.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.locations.is_empty() {
            return Err(InvalidInput::NoLocations);
        }
        let mut seen = HashSet::new();
        for location in &self.locations {
            location.validate()?;
            if !seen.insert(location.name.as_str()) {
                return Err(InvalidInput::DuplicateLocation(location.name.clone()));
            }
        }
        self.period.ensure_archived(Utc::now().date_naive())?;
        if self.concurrency == 0 {
            return Err(config_value(
                "FETCH_CONCURRENCY",
                "0",
                "at least one request must be allowed",
            ));
        }
        if self.timezone.trim().is_empty() {
            return Err(config_value("APP_TIMEZONE", "", "timezone is empty"));
        }
        Ok(())
    }

    /// Reads the configuration from the process environment.
    ///
    /// | variable | default |
    /// |---|---|
    /// | `DEFAULT_START_DATE` | `2013-01-01` |
    /// | `DEFAULT_END_DATE` | `2023-12-31` |
    /// | `APP_TIMEZONE` | `Europe/Paris` |
    /// | `PACA_LOCATIONS` | all six cities |
    /// | `PACA_DATA_DIR` | platform data dir |
    /// | `TREND_WINDOW_DAYS` | `7` |
    /// | `FORCE_DOWNLOAD` | `false` |
    /// | `FETCH_CONCURRENCY` | `1` |
    /// | `OPEN_METEO_ARCHIVE_URL` | Open-Meteo archive |
    pub fn from_env() -> Result<Self, InvalidInput> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PipelineConfig::from_env`] with an arbitrary variable source.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InvalidInput> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let start = parse_date("DEFAULT_START_DATE", var("DEFAULT_START_DATE"), DEFAULT_START_DATE)?;
        let end = parse_date("DEFAULT_END_DATE", var("DEFAULT_END_DATE"), DEFAULT_END_DATE)?;
        let period = DateRange::new(start, end)?;

        let locations = match var("PACA_LOCATIONS") {
            Some(names) => names
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(Location::by_name)
                .collect::<Result<Vec<_>, _>>()?,
            None => Location::paca_region(),
        };

        let trend_window = match var("TREND_WINDOW_DAYS") {
            Some(raw) => TrendWindow::new(parse_number("TREND_WINDOW_DAYS", &raw)?)?,
            None => TrendWindow::default(),
        };
        let concurrency = match var("FETCH_CONCURRENCY") {
            Some(raw) => parse_number("FETCH_CONCURRENCY", &raw)?,
            None => 1,
        };
        let force_download = match var("FORCE_DOWNLOAD") {
            Some(raw) => parse_flag("FORCE_DOWNLOAD", &raw)?,
            None => false,
        };

        Ok(PipelineConfig::builder()
            .locations(locations)
            .period(period)
            .data_dir(var("PACA_DATA_DIR").map_or_else(default_data_dir, PathBuf::from))
            .timezone(var("APP_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()))
            .trend_window(trend_window)
            .concurrency(concurrency)
            .force_download(force_download)
            .archive_url(var("OPEN_METEO_ARCHIVE_URL").unwrap_or_else(|| ARCHIVE_URL.to_string()))
            .build())
    }
}

fn config_value(key: &str, value: &str, reason: impl Into<String>) -> InvalidInput {
    InvalidInput::ConfigValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_date(key: &str, value: Option<String>, default: &str) -> Result<NaiveDate, InvalidInput> {
    let value = value.unwrap_or_else(|| default.to_string());
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map_err(|_| config_value(key, &value, "expected a YYYY-MM-DD date"))
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, InvalidInput> {
    value
        .parse()
        .map_err(|_| config_value(key, value, "expected a non-negative integer"))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, InvalidInput> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(config_value(key, value, "expected true or false")),
    }
}
