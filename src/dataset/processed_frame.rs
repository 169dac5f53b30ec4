//! Contains [`ProcessedLazyFrame`], a lazy view over the processed dataset.

use crate::dataset::artifact::read_csv;
use crate::dataset::error::DatasetError;
use crate::dataset::frames::{frame_to_records, records_to_frame};
use crate::dataset::schema::DatasetKind;
use crate::filtering::ClimateFrameFilterExt;
use crate::types::date_range::{DatePeriod, DateRange};
use crate::types::records::ProcessedRecord;
use chrono::NaiveDate;
use polars::prelude::{Expr, IntoLazy, LazyFrame};
use std::path::Path;

/// A wrapper around a Polars `LazyFrame` holding processed climate records.
///
/// Columns are typed: measured and derived values are `Float64`, flags are
/// `Boolean`, `location` and `date` are strings (`date` as `YYYY-MM-DD`).
/// Filters compose lazily; nothing is computed until `.frame.collect()`.
///
/// # Example
///
/// ```no_run
/// # use paca_climate::{ProcessedLazyFrame, Year};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let view = ProcessedLazyFrame::load("data/processed/openmeteo_paca_2013-01-01_2023-12-31_processed.csv").await?;
/// let nice_2020 = view.for_location("Nice").get_for_period(Year(2020))?.complete_only();
/// println!("{}", nice_2020.frame.collect()?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProcessedLazyFrame {
    /// The underlying Polars LazyFrame.
    pub frame: LazyFrame,
}

impl ProcessedLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Builds a typed view from in-memory records.
    pub fn from_records(records: &[ProcessedRecord]) -> Result<Self, DatasetError> {
        Ok(Self::new(records_to_frame(records)?.lazy()))
    }

    /// Loads and validates a processed artifact.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotFound`] or [`DatasetError::MissingColumns`] for an
    /// unusable file, and a row-level error for any unparsable cell.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let df = read_csv(path.as_ref(), DatasetKind::Processed).await?;
        let records = frame_to_records(&df)?;
        Self::from_records(&records)
    }

    /// Filters with an arbitrary Polars predicate.
    pub fn filter(&self, predicate: Expr) -> ProcessedLazyFrame {
        ProcessedLazyFrame::new(self.frame.clone().filter(predicate))
    }

    pub fn for_location(&self, name: &str) -> ProcessedLazyFrame {
        self.for_locations(&[name])
    }

    pub fn for_locations(&self, names: &[&str]) -> ProcessedLazyFrame {
        ProcessedLazyFrame::new(self.frame.clone().filter_locations(names))
    }

    /// Rows dated within `range`, both ends included.
    pub fn get_range(&self, range: DateRange) -> ProcessedLazyFrame {
        ProcessedLazyFrame::new(self.frame.clone().filter_dates(range))
    }

    /// Rows for a single day; at most one per location.
    pub fn get_at(&self, date: NaiveDate) -> ProcessedLazyFrame {
        self.get_range(DateRange::from_day(date))
    }

    /// Rows within a [`DatePeriod`] such as a [`crate::Year`] or [`crate::Month`].
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidPeriod`] if the period has no valid date range.
    pub fn get_for_period(
        &self,
        period: impl DatePeriod,
    ) -> Result<ProcessedLazyFrame, DatasetError> {
        let range = period
            .get_date_period()
            .ok_or(DatasetError::InvalidPeriod)?;
        Ok(self.get_range(range))
    }

    /// Drops rows with any missing raw field.
    pub fn complete_only(&self) -> ProcessedLazyFrame {
        ProcessedLazyFrame::new(self.frame.clone().filter_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::artifact::write_csv;
    use crate::types::date_range::{Month, Year};
    use crate::types::records::RawObservation;
    use polars::prelude::*;
    use tempfile::tempdir;

    fn record(location: &str, date: &str, temp_max: Option<f64>) -> ProcessedRecord {
        let observation = RawObservation {
            location: location.to_string(),
            date: date.parse().unwrap(),
            temp_min: Some(10.0),
            temp_max,
            precipitation: Some(0.0),
            wind: Some(12.0),
        };
        let is_incomplete = observation.is_incomplete();
        ProcessedRecord {
            observation,
            t_mean: temp_max.map(|max| (max + 10.0) / 2.0),
            diurnal_range: temp_max.map(|max| max - 10.0),
            trend_metric: None,
            hot_day_30: temp_max.map(|max| max >= 30.0),
            hot_day_35: temp_max.map(|max| max >= 35.0),
            heavy_rain_20: Some(false),
            is_incomplete,
        }
    }

    fn records() -> Vec<ProcessedRecord> {
        vec![
            record("Avignon", "2020-01-31", Some(12.0)),
            record("Avignon", "2020-02-01", None),
            record("Avignon", "2021-02-01", Some(14.0)),
            record("Nice", "2020-02-01", Some(16.0)),
        ]
    }

    #[test]
    fn test_location_and_period_filters() {
        let view = ProcessedLazyFrame::from_records(&records()).unwrap();

        let avignon = view.for_location("Avignon").frame.collect().unwrap();
        assert_eq!(avignon.height(), 3);

        let year = view.get_for_period(Year(2020)).unwrap().frame.collect().unwrap();
        assert_eq!(year.height(), 3);

        let february = view
            .get_for_period(Month::new(2020, 2))
            .unwrap()
            .complete_only()
            .frame
            .collect()
            .unwrap();
        assert_eq!(february.height(), 1);
        assert_eq!(
            february.column("location").unwrap().str().unwrap().get(0),
            Some("Nice")
        );
    }

    #[test]
    fn test_get_at_and_predicate() {
        let view = ProcessedLazyFrame::from_records(&records()).unwrap();
        let day = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        assert_eq!(view.get_at(day).frame.collect().unwrap().height(), 2);

        let warm = view.filter(col("temp_max").gt(lit(13.0))).frame.collect().unwrap();
        assert_eq!(warm.height(), 2);
    }

    #[test]
    fn test_invalid_period() {
        let view = ProcessedLazyFrame::from_records(&records()).unwrap();
        assert!(matches!(
            view.get_for_period(Month::new(2020, 0)),
            Err(DatasetError::InvalidPeriod)
        ));
    }

    #[tokio::test]
    async fn test_load_from_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("processed.csv");
        write_csv(records_to_frame(&records()).unwrap(), &path)
            .await
            .unwrap();

        let view = ProcessedLazyFrame::load(&path).await.unwrap();
        let df = view.frame.collect().unwrap();
        assert_eq!(df.height(), 4);
        assert_eq!(df.column("temp_max").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("is_incomplete").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("temp_max").unwrap().f64().unwrap().get(1), None);
    }
}
