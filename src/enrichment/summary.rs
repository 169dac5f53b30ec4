//! Calendar-year aggregates per location.

use crate::types::records::{ProcessedRecord, YearlySummary};
use chrono::Datelike;
use std::collections::BTreeMap;

#[derive(Default)]
struct YearAccumulator {
    days: u32,
    mean_days: u32,
    t_mean_sum: f64,
    rain_days: u32,
    rain_sum: f64,
    hot_days_30: u32,
    hot_days_35: u32,
    heavy_rain_days: u32,
    incomplete_days: u32,
}

impl YearAccumulator {
    fn add(&mut self, record: &ProcessedRecord) {
        self.days += 1;
        if let Some(t_mean) = record.t_mean {
            self.mean_days += 1;
            self.t_mean_sum += t_mean;
        }
        if let Some(rain) = record.observation.precipitation {
            self.rain_days += 1;
            self.rain_sum += rain;
        }
        self.hot_days_30 += u32::from(record.hot_day_30 == Some(true));
        self.hot_days_35 += u32::from(record.hot_day_35 == Some(true));
        self.heavy_rain_days += u32::from(record.heavy_rain_20 == Some(true));
        self.incomplete_days += u32::from(record.is_incomplete);
    }

    fn finish(self, location: String, year: i32) -> YearlySummary {
        YearlySummary {
            location,
            year,
            days: self.days,
            mean_days: self.mean_days,
            t_mean: (self.mean_days > 0).then(|| self.t_mean_sum / f64::from(self.mean_days)),
            precipitation: (self.rain_days > 0).then_some(self.rain_sum),
            hot_days_30: self.hot_days_30,
            hot_days_35: self.hot_days_35,
            heavy_rain_days: self.heavy_rain_days,
            incomplete_days: self.incomplete_days,
        }
    }
}

/// Aggregates records per (location, year), skipping missing values.
///
/// Output is ordered by location then year. Summation follows input order, so
/// sorted input gives reproducible floating point results.
pub fn yearly_summaries(records: &[ProcessedRecord]) -> Vec<YearlySummary> {
    let mut years: BTreeMap<(&str, i32), YearAccumulator> = BTreeMap::new();
    for record in records {
        years
            .entry((record.location(), record.date().year()))
            .or_default()
            .add(record);
    }
    years
        .into_iter()
        .map(|((location, year), acc)| acc.finish(location.to_string(), year))
        .collect()
}
