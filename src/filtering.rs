use crate::dataset::schema::{DATE, IS_INCOMPLETE, LOCATION};
use crate::types::date_range::DateRange;
use polars::prelude::{col, lit, LazyFrame};

pub trait ClimateFrameFilterExt {
    /// Keeps rows whose `date` falls inside `range` (inclusive).
    /// Assumes the 'date' column holds 'YYYY-MM-DD' strings, which order like dates.
    fn filter_dates(self, range: DateRange) -> LazyFrame;

    /// Keeps rows whose `location` is one of `names`. An empty slice keeps nothing.
    fn filter_locations(self, names: &[&str]) -> LazyFrame;

    /// Drops rows flagged as incomplete.
    fn filter_complete(self) -> LazyFrame;
}

impl ClimateFrameFilterExt for LazyFrame {
    fn filter_dates(self, range: DateRange) -> LazyFrame {
        self.filter(
            col(DATE)
                .gt_eq(lit(format_date(range.start())))
                .and(col(DATE).lt_eq(lit(format_date(range.end())))),
        )
    }

    fn filter_locations(self, names: &[&str]) -> LazyFrame {
        let predicate = names
            .iter()
            .map(|name| col(LOCATION).eq(lit(name.to_string())))
            .reduce(|acc, expr| acc.or(expr))
            .unwrap_or_else(|| lit(false));
        self.filter(predicate)
    }

    fn filter_complete(self) -> LazyFrame {
        self.filter(col(IS_INCOMPLETE).not())
    }
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use polars::prelude::*;

    fn frame() -> LazyFrame {
        df!(
            "location" => ["Nice", "Nice", "Gap", "Gap"],
            "date" => ["2023-12-31", "2024-01-01", "2023-12-31", "2024-01-01"],
            "is_incomplete" => [false, true, false, false],
        )
        .unwrap()
        .lazy()
    }

    #[test]
    fn test_filter_dates_inclusive() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let df = frame()
            .filter_dates(DateRange::new(day, day).unwrap())
            .collect()
            .unwrap();
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_filter_locations() {
        assert_eq!(frame().filter_locations(&["Gap"]).collect().unwrap().height(), 2);
        assert_eq!(
            frame()
                .filter_locations(&["Gap", "Nice"])
                .collect()
                .unwrap()
                .height(),
            4
        );
        assert_eq!(frame().filter_locations(&[]).collect().unwrap().height(), 0);
    }

    #[test]
    fn test_filter_complete() {
        let df = frame().filter_complete().collect().unwrap();
        assert_eq!(df.height(), 3);
    }
}
