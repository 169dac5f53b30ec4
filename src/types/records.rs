use chrono::NaiveDate;

/// One unprocessed daily record for one location.
///
/// Every measured field is optional: `None` is the explicit missing marker and is
/// never replaced by a default.
#[derive(Debug, PartialEq, Clone)]
pub struct RawObservation {
    pub location: String,
    pub date: NaiveDate,
    pub temp_min: Option<f64>,      // °C
    pub temp_max: Option<f64>,      // °C
    pub precipitation: Option<f64>, // mm, daily sum
    pub wind: Option<f64>,          // km/h, daily max at 10 m
}

impl RawObservation {
    /// True when any measured field is missing.
    pub fn is_incomplete(&self) -> bool {
        self.temp_min.is_none()
            || self.temp_max.is_none()
            || self.precipitation.is_none()
            || self.wind.is_none()
    }
}

/// A [`RawObservation`] extended with derived climate indicators.
#[derive(Debug, PartialEq, Clone)]
pub struct ProcessedRecord {
    pub observation: RawObservation,
    pub t_mean: Option<f64>,
    pub diurnal_range: Option<f64>,
    pub trend_metric: Option<f64>,
    pub hot_day_30: Option<bool>,
    pub hot_day_35: Option<bool>,
    pub heavy_rain_20: Option<bool>,
    pub is_incomplete: bool,
}

impl ProcessedRecord {
    pub fn location(&self) -> &str {
        &self.observation.location
    }

    pub fn date(&self) -> NaiveDate {
        self.observation.date
    }
}

/// Calendar-year aggregates for one location.
///
/// Averages and sums only consider days where the source value is present;
/// `mean_days` tells how many days fed `t_mean`.
#[derive(Debug, PartialEq, Clone)]
pub struct YearlySummary {
    pub location: String,
    pub year: i32,
    pub days: u32,
    pub mean_days: u32,
    pub t_mean: Option<f64>,
    pub precipitation: Option<f64>,
    pub hot_days_30: u32,
    pub hot_days_35: u32,
    pub heavy_rain_days: u32,
    pub incomplete_days: u32,
}
