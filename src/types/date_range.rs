use crate::error::InvalidInput;
use chrono::{Months, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// First day served by the Open-Meteo historical archive.
pub fn earliest_archive_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1940, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// An inclusive, non-empty range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`InvalidInput::EmptyDateRange`] when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidInput> {
        if start > end {
            return Err(InvalidInput::EmptyDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day.
    pub fn from_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Builds a range from any [`DatePeriod`], such as a [`Year`] or a [`Month`].
    pub fn from_period(period: impl DatePeriod) -> Option<Self> {
        period.get_date_period()
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both ends included.
    pub fn num_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.num_days())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Rejects ranges the archive cannot serve: starting before its history or
    /// ending after `today`.
    pub fn ensure_archived(&self, today: NaiveDate) -> Result<(), InvalidInput> {
        let earliest = earliest_archive_date();
        if self.start < earliest {
            return Err(InvalidInput::BeforeArchive {
                start: self.start,
                earliest,
            });
        }
        if self.end > today {
            return Err(InvalidInput::FutureEndDate {
                end: self.end,
                today,
            });
        }
        Ok(())
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// A calendar year.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);

/// A calendar month of a given year. Months are numbered from 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Anything that resolves to a span of whole days.
pub trait DatePeriod {
    fn get_date_period(self) -> Option<DateRange>;
}

impl DatePeriod for DateRange {
    fn get_date_period(self) -> Option<DateRange> {
        Some(self)
    }
}

impl DatePeriod for Year {
    fn get_date_period(self) -> Option<DateRange> {
        let first = NaiveDate::from_yo_opt(self.0, 1)?;
        let last = NaiveDate::from_yo_opt(self.0.checked_add(1)?, 1)?.pred_opt()?;
        DateRange::new(first, last).ok()
    }
}

impl DatePeriod for Month {
    fn get_date_period(self) -> Option<DateRange> {
        let first = self.first_day()?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        DateRange::new(first, last).ok()
    }
}
