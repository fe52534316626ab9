use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::{end_of_day, start_of_day};

/// Committed date-range selection with inclusive day boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// Start of the earlier day (00:00)
    pub start: NaiveDateTime,
    /// End of the later day (23:59:59.999)
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Build a range from two dates in either order
    pub fn spanning(a: NaiveDate, b: NaiveDate) -> Self {
        let (first, last) = if a <= b { (a, b) } else { (b, a) };
        Self {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    /// A range covering exactly one day
    pub fn single_day(date: NaiveDate) -> Self {
        Self::spanning(date, date)
    }

    pub fn first_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn last_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        (self.last_date() - self.first_date()).num_days() + 1
    }
}
