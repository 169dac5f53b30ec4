//! Column layout of every artifact the pipeline writes.

use polars::prelude::DataType;
use std::fmt;

/// Written in place of a missing value in CSV artifacts.
pub const NULL_MARKER: &str = "NA";

pub const LOCATION: &str = "location";
pub const DATE: &str = "date";
pub const TEMP_MIN: &str = "temp_min";
pub const TEMP_MAX: &str = "temp_max";
pub const PRECIPITATION: &str = "precipitation";
pub const WIND: &str = "wind";
pub const T_MEAN: &str = "t_mean";
pub const DIURNAL_RANGE: &str = "diurnal_range";
pub const TREND_METRIC: &str = "trend_metric";
pub const HOT_DAY_30: &str = "hot_day_30";
pub const HOT_DAY_35: &str = "hot_day_35";
pub const HEAVY_RAIN_20: &str = "heavy_rain_20";
pub const IS_INCOMPLETE: &str = "is_incomplete";
pub const YEAR: &str = "year";
pub const DAYS: &str = "days";
pub const MEAN_DAYS: &str = "mean_days";
pub const HOT_DAYS_30: &str = "hot_days_30";
pub const HOT_DAYS_35: &str = "hot_days_35";
pub const HEAVY_RAIN_DAYS: &str = "heavy_rain_days";
pub const INCOMPLETE_DAYS: &str = "incomplete_days";

/// The three artifacts a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Raw,
    Processed,
    YearlySummary,
}

impl DatasetKind {
    /// Column names and types, in file order.
    pub fn columns(&self) -> Vec<(&'static str, DataType)> {
        let raw = vec![
            (LOCATION, DataType::String),
            (DATE, DataType::String),
            (TEMP_MIN, DataType::Float64),
            (TEMP_MAX, DataType::Float64),
            (PRECIPITATION, DataType::Float64),
            (WIND, DataType::Float64),
        ];
        match self {
            DatasetKind::Raw => raw,
            DatasetKind::Processed => raw
                .into_iter()
                .chain([
                    (T_MEAN, DataType::Float64),
                    (DIURNAL_RANGE, DataType::Float64),
                    (TREND_METRIC, DataType::Float64),
                    (HOT_DAY_30, DataType::Boolean),
                    (HOT_DAY_35, DataType::Boolean),
                    (HEAVY_RAIN_20, DataType::Boolean),
                    (IS_INCOMPLETE, DataType::Boolean),
                ])
                .collect(),
            DatasetKind::YearlySummary => vec![
                (LOCATION, DataType::String),
                (YEAR, DataType::Int32),
                (DAYS, DataType::UInt32),
                (MEAN_DAYS, DataType::UInt32),
                (T_MEAN, DataType::Float64),
                (PRECIPITATION, DataType::Float64),
                (HOT_DAYS_30, DataType::UInt32),
                (HOT_DAYS_35, DataType::UInt32),
                (HEAVY_RAIN_DAYS, DataType::UInt32),
                (INCOMPLETE_DAYS, DataType::UInt32),
            ],
        }
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns().into_iter().map(|(name, _)| name).collect()
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Raw => write!(f, "raw"),
            DatasetKind::Processed => write!(f, "processed"),
            DatasetKind::YearlySummary => write!(f, "yearly summary"),
        }
    }
}
