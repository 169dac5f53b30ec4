//! Per-record derived values. Every function propagates missing inputs.

/// Daily maximum at or above which a day counts as hot (°C).
pub const HOT_DAY_THRESHOLD: f64 = 30.0;
/// Daily maximum at or above which a day counts as very hot (°C).
pub const VERY_HOT_DAY_THRESHOLD: f64 = 35.0;
/// Daily precipitation at or above which a day counts as heavy rain (mm).
pub const HEAVY_RAIN_THRESHOLD: f64 = 20.0;

/// Midpoint of the daily minimum and maximum.
pub fn daily_mean(temp_min: Option<f64>, temp_max: Option<f64>) -> Option<f64> {
    Some((temp_min? + temp_max?) / 2.0)
}

/// Daily maximum minus daily minimum.
pub fn diurnal_range(temp_min: Option<f64>, temp_max: Option<f64>) -> Option<f64> {
    Some(temp_max? - temp_min?)
}

pub fn at_least(value: Option<f64>, threshold: f64) -> Option<bool> {
    value.map(|v| v >= threshold)
}
