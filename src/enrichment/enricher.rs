use crate::enrichment::error::EnrichmentError;
use crate::enrichment::indicators::{
    at_least, daily_mean, diurnal_range, HEAVY_RAIN_THRESHOLD, HOT_DAY_THRESHOLD,
    VERY_HOT_DAY_THRESHOLD,
};
use crate::enrichment::summary::yearly_summaries;
use crate::enrichment::trend::trailing_mean;
use crate::types::records::{ProcessedRecord, RawObservation, YearlySummary};
use crate::types::trend_window::TrendWindow;
use log::{debug, info};
use std::collections::BTreeMap;

/// Output of [`enrich`]: one record per input observation plus yearly aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedDataset {
    /// Sorted by location, then date.
    pub records: Vec<ProcessedRecord>,
    pub yearly: Vec<YearlySummary>,
}

/// Derives every indicator for a raw dataset.
///
/// Input order does not matter; output is sorted by location then date and is
/// identical for identical input.
///
/// # Errors
///
/// Fails on an empty dataset, a repeated (location, date) key, or a gap inside a
/// location's series.
pub fn enrich(
    observations: Vec<RawObservation>,
    window: TrendWindow,
) -> Result<EnrichedDataset, EnrichmentError> {
    if observations.is_empty() {
        return Err(EnrichmentError::EmptyDataset);
    }
    let total = observations.len();

    let mut series: BTreeMap<String, Vec<RawObservation>> = BTreeMap::new();
    for observation in observations {
        series
            .entry(observation.location.clone())
            .or_default()
            .push(observation);
    }

    let mut records = Vec::with_capacity(total);
    for (location, mut days) in series {
        days.sort_by_key(|o| o.date);
        check_contiguous(&location, &days)?;
        debug!(
            "Enriching {} days for {} with a {} trend",
            days.len(),
            location,
            window
        );
        records.extend(enrich_series(days, window));
    }

    let yearly = yearly_summaries(&records);
    info!(
        "Enriched {} records into {} yearly summaries",
        records.len(),
        yearly.len()
    );
    Ok(EnrichedDataset { records, yearly })
}

/// Expects one location's observations in date order.
fn enrich_series(days: Vec<RawObservation>, window: TrendWindow) -> Vec<ProcessedRecord> {
    let means: Vec<Option<f64>> = days
        .iter()
        .map(|o| daily_mean(o.temp_min, o.temp_max))
        .collect();
    let trend = trailing_mean(&means, window);

    days.into_iter()
        .zip(means)
        .zip(trend)
        .map(|((observation, t_mean), trend_metric)| ProcessedRecord {
            diurnal_range: diurnal_range(observation.temp_min, observation.temp_max),
            hot_day_30: at_least(observation.temp_max, HOT_DAY_THRESHOLD),
            hot_day_35: at_least(observation.temp_max, VERY_HOT_DAY_THRESHOLD),
            heavy_rain_20: at_least(observation.precipitation, HEAVY_RAIN_THRESHOLD),
            is_incomplete: observation.is_incomplete(),
            t_mean,
            trend_metric,
            observation,
        })
        .collect()
}

fn check_contiguous(location: &str, days: &[RawObservation]) -> Result<(), EnrichmentError> {
    for pair in days.windows(2) {
        let (previous, next) = (pair[0].date, pair[1].date);
        if previous == next {
            return Err(EnrichmentError::DuplicateKey {
                location: location.to_string(),
                date: next,
            });
        }
        if previous.succ_opt() != Some(next) {
            return Err(EnrichmentError::NonContiguous {
                location: location.to_string(),
                previous,
                next,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(location: &str, date: &str, min: Option<f64>, max: Option<f64>) -> RawObservation {
        RawObservation {
            location: location.to_string(),
            date: date.parse().unwrap(),
            temp_min: min,
            temp_max: max,
            precipitation: Some(0.0),
            wind: Some(10.0),
        }
    }

    fn week(location: &str) -> Vec<RawObservation> {
        (1..=10)
            .map(|day| {
                let t = day as f64;
                obs(location, &format!("2023-08-{day:02}"), Some(t), Some(t))
            })
            .collect()
    }

    #[test]
    fn test_diurnal_range_scenarios() {
        let dataset = enrich(
            vec![
                obs("Nice", "2023-01-01", Some(10.0), Some(20.0)),
                obs("Nice", "2023-01-02", Some(10.0), None),
            ],
            TrendWindow::default(),
        )
        .unwrap();

        let first = &dataset.records[0];
        assert_eq!(first.diurnal_range, Some(10.0));
        assert_eq!(first.t_mean, Some(15.0));
        assert!(!first.is_incomplete);

        let second = &dataset.records[1];
        assert_eq!(second.diurnal_range, None);
        assert_eq!(second.t_mean, None);
        assert_eq!(second.trend_metric, None);
        assert_eq!(second.hot_day_30, None);
        assert!(second.is_incomplete);
    }

    #[test]
    fn test_trend_first_day_and_full_window() {
        let dataset = enrich(week("Gap"), TrendWindow::default()).unwrap();
        assert_eq!(dataset.records[0].trend_metric, Some(1.0));
        // mean of days 4..=10
        assert_eq!(dataset.records[9].trend_metric, Some(7.0));
    }

    #[test]
    fn test_sorted_by_location_then_date_and_row_count_preserved() {
        let mut input = week("Toulon");
        input.extend(week("Avignon"));
        input.reverse();

        let dataset = enrich(input.clone(), TrendWindow::default()).unwrap();
        assert_eq!(dataset.records.len(), input.len());

        let keys: Vec<(&str, NaiveDate)> = dataset
            .records
            .iter()
            .map(|r| (r.location(), r.date()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys[0].0, "Avignon");
    }

    #[test]
    fn test_enrichment_is_deterministic() {
        let mut input = week("Marseille");
        input.push(obs("Marseille", "2023-08-11", None, Some(31.0)));
        let first = enrich(input.clone(), TrendWindow::default()).unwrap();
        let second = enrich(input, TrendWindow::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_window_is_per_location() {
        let mut input = week("Nice");
        input.extend(week("Gap").into_iter().map(|mut o| {
            o.temp_min = Some(100.0);
            o.temp_max = Some(100.0);
            o
        }));
        let dataset = enrich(input, TrendWindow::new(3).unwrap()).unwrap();
        let nice_first = dataset
            .records
            .iter()
            .find(|r| r.location() == "Nice")
            .unwrap();
        assert_eq!(nice_first.trend_metric, Some(1.0));
    }

    #[test]
    fn test_empty_dataset() {
        assert_eq!(
            enrich(Vec::new(), TrendWindow::default()),
            Err(EnrichmentError::EmptyDataset)
        );
    }

    #[test]
    fn test_duplicate_key() {
        let err = enrich(
            vec![
                obs("Nice", "2023-01-01", Some(1.0), Some(2.0)),
                obs("Nice", "2023-01-01", Some(1.0), Some(2.0)),
            ],
            TrendWindow::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EnrichmentError::DuplicateKey { .. }));
    }

    #[test]
    fn test_gap_in_series() {
        let err = enrich(
            vec![
                obs("Nice", "2023-01-01", Some(1.0), Some(2.0)),
                obs("Nice", "2023-01-03", Some(1.0), Some(2.0)),
            ],
            TrendWindow::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EnrichmentError::NonContiguous {
                location: "Nice".to_string(),
                previous: "2023-01-01".parse().unwrap(),
                next: "2023-01-03".parse().unwrap(),
            }
        );
    }
}
