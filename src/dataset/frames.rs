//! Conversions between typed records and polars frames.

use crate::dataset::error::DatasetError;
use crate::dataset::schema::*;
use crate::types::records::{ProcessedRecord, RawObservation, YearlySummary};
use chrono::NaiveDate;
use polars::prelude::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn observations_to_frame(observations: &[RawObservation]) -> Result<DataFrame, DatasetError> {
    Ok(DataFrame::new(raw_columns(observations.iter()))?)
}

pub fn records_to_frame(records: &[ProcessedRecord]) -> Result<DataFrame, DatasetError> {
    let mut columns = raw_columns(records.iter().map(|r| &r.observation));
    columns.extend([
        float_column(T_MEAN, records.iter().map(|r| r.t_mean)),
        float_column(DIURNAL_RANGE, records.iter().map(|r| r.diurnal_range)),
        float_column(TREND_METRIC, records.iter().map(|r| r.trend_metric)),
        Column::new(
            HOT_DAY_30.into(),
            records.iter().map(|r| r.hot_day_30).collect::<Vec<_>>(),
        ),
        Column::new(
            HOT_DAY_35.into(),
            records.iter().map(|r| r.hot_day_35).collect::<Vec<_>>(),
        ),
        Column::new(
            HEAVY_RAIN_20.into(),
            records.iter().map(|r| r.heavy_rain_20).collect::<Vec<_>>(),
        ),
        Column::new(
            IS_INCOMPLETE.into(),
            records.iter().map(|r| r.is_incomplete).collect::<Vec<_>>(),
        ),
    ]);
    Ok(DataFrame::new(columns)?)
}

pub fn summaries_to_frame(summaries: &[YearlySummary]) -> Result<DataFrame, DatasetError> {
    let counts = |name: &str, get: fn(&YearlySummary) -> u32| {
        Column::new(name.into(), summaries.iter().map(get).collect::<Vec<u32>>())
    };
    Ok(DataFrame::new(vec![
        Column::new(
            LOCATION.into(),
            summaries
                .iter()
                .map(|s| s.location.as_str())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            YEAR.into(),
            summaries.iter().map(|s| s.year).collect::<Vec<i32>>(),
        ),
        counts(DAYS, |s| s.days),
        counts(MEAN_DAYS, |s| s.mean_days),
        float_column(T_MEAN, summaries.iter().map(|s| s.t_mean)),
        float_column(PRECIPITATION, summaries.iter().map(|s| s.precipitation)),
        counts(HOT_DAYS_30, |s| s.hot_days_30),
        counts(HOT_DAYS_35, |s| s.hot_days_35),
        counts(HEAVY_RAIN_DAYS, |s| s.heavy_rain_days),
        counts(INCOMPLETE_DAYS, |s| s.incomplete_days),
    ])?)
}

/// Parses a string-typed raw frame (see [`crate::dataset::artifact::read_csv`]).
///
/// Key columns must be present on every row; measured columns may be null.
pub fn frame_to_observations(df: &DataFrame) -> Result<Vec<RawObservation>, DatasetError> {
    let cells = RawCells::new(df)?;
    (0..df.height()).map(|row| cells.observation(row)).collect()
}

/// Parses a string-typed processed frame back into records.
pub fn frame_to_records(df: &DataFrame) -> Result<Vec<ProcessedRecord>, DatasetError> {
    let cells = RawCells::new(df)?;
    let t_mean = strings(df, T_MEAN)?;
    let diurnal_range = strings(df, DIURNAL_RANGE)?;
    let trend_metric = strings(df, TREND_METRIC)?;
    let hot_day_30 = strings(df, HOT_DAY_30)?;
    let hot_day_35 = strings(df, HOT_DAY_35)?;
    let heavy_rain_20 = strings(df, HEAVY_RAIN_20)?;
    let is_incomplete = strings(df, IS_INCOMPLETE)?;

    (0..df.height())
        .map(|row| {
            Ok(ProcessedRecord {
                observation: cells.observation(row)?,
                t_mean: parse_f64(row, T_MEAN, t_mean.get(row))?,
                diurnal_range: parse_f64(row, DIURNAL_RANGE, diurnal_range.get(row))?,
                trend_metric: parse_f64(row, TREND_METRIC, trend_metric.get(row))?,
                hot_day_30: parse_bool(row, HOT_DAY_30, hot_day_30.get(row))?,
                hot_day_35: parse_bool(row, HOT_DAY_35, hot_day_35.get(row))?,
                heavy_rain_20: parse_bool(row, HEAVY_RAIN_20, heavy_rain_20.get(row))?,
                is_incomplete: parse_bool(row, IS_INCOMPLETE, is_incomplete.get(row))?
                    .ok_or_else(|| null_key(row, IS_INCOMPLETE))?,
            })
        })
        .collect()
}

fn raw_columns<'a>(observations: impl Iterator<Item = &'a RawObservation> + Clone) -> Vec<Column> {
    vec![
        Column::new(
            LOCATION.into(),
            observations
                .clone()
                .map(|o| o.location.as_str())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            DATE.into(),
            observations
                .clone()
                .map(|o| o.date.format(DATE_FORMAT).to_string())
                .collect::<Vec<_>>(),
        ),
        float_column(TEMP_MIN, observations.clone().map(|o| o.temp_min)),
        float_column(TEMP_MAX, observations.clone().map(|o| o.temp_max)),
        float_column(PRECIPITATION, observations.clone().map(|o| o.precipitation)),
        float_column(WIND, observations.map(|o| o.wind)),
    ]
}

fn float_column(name: &str, values: impl Iterator<Item = Option<f64>>) -> Column {
    Column::new(name.into(), values.collect::<Vec<_>>())
}

/// Borrowed string views over the six raw columns.
struct RawCells<'a> {
    location: &'a StringChunked,
    date: &'a StringChunked,
    temp_min: &'a StringChunked,
    temp_max: &'a StringChunked,
    precipitation: &'a StringChunked,
    wind: &'a StringChunked,
}

impl<'a> RawCells<'a> {
    fn new(df: &'a DataFrame) -> Result<Self, DatasetError> {
        Ok(Self {
            location: strings(df, LOCATION)?,
            date: strings(df, DATE)?,
            temp_min: strings(df, TEMP_MIN)?,
            temp_max: strings(df, TEMP_MAX)?,
            precipitation: strings(df, PRECIPITATION)?,
            wind: strings(df, WIND)?,
        })
    }

    fn observation(&self, row: usize) -> Result<RawObservation, DatasetError> {
        let location = self
            .location
            .get(row)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| null_key(row, LOCATION))?;
        let date = self.date.get(row).ok_or_else(|| null_key(row, DATE))?;
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|_| {
            DatasetError::MalformedDate {
                row,
                value: date.to_string(),
            }
        })?;

        Ok(RawObservation {
            location: location.to_string(),
            date,
            temp_min: parse_f64(row, TEMP_MIN, self.temp_min.get(row))?,
            temp_max: parse_f64(row, TEMP_MAX, self.temp_max.get(row))?,
            precipitation: parse_f64(row, PRECIPITATION, self.precipitation.get(row))?,
            wind: parse_f64(row, WIND, self.wind.get(row))?,
        })
    }
}

fn strings<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked, DatasetError> {
    Ok(df.column(name)?.as_materialized_series().str()?)
}

fn null_key(row: usize, column: &str) -> DatasetError {
    DatasetError::NullKey {
        row,
        column: column.to_string(),
    }
}

fn malformed(row: usize, column: &str, value: &str) -> DatasetError {
    DatasetError::MalformedValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn parse_f64(row: usize, column: &str, cell: Option<&str>) -> Result<Option<f64>, DatasetError> {
    cell.map(|value| {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| malformed(row, column, value))
    })
    .transpose()
}

fn parse_bool(row: usize, column: &str, cell: Option<&str>) -> Result<Option<bool>, DatasetError> {
    cell.map(|value| match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(malformed(row, column, value)),
    })
    .transpose()
}
