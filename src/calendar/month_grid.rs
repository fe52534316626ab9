//! Month matrix construction and month-key arithmetic

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// One week row of the month grid (Sunday first); `None` pads days
/// outside the month
pub type WeekRow = [Option<NaiveDate>; 7];

/// Month names indexed by 0-based month
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A (year, 0-based month) pair identifying one rendered month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    /// 0 = January
    pub month0: u32,
}

impl MonthKey {
    /// Build a key, normalizing an out-of-range month into the year
    /// (month -1 is December of the previous year, 12 is next January)
    pub fn new(year: i32, month0: i32) -> Self {
        Self {
            year: year + month0.div_euclid(12),
            month0: month0.rem_euclid(12) as u32,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// Shift by a signed number of months
    pub fn offset(self, months: i32) -> Self {
        Self::new(self.year, self.month0 as i32 + months)
    }

    /// First day of the month, `None` outside chrono's representable range
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
    }

    /// Number of days, taken as the day-of-month of "day 0 of next month"
    pub fn days_in_month(self) -> u32 {
        self.offset(1)
            .first_day()
            .and_then(|next| next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(0)
    }

    /// Human-readable label, e.g. "March 2025"
    pub fn label(self) -> String {
        format!("{} {}", MONTH_NAMES[self.month0 as usize], self.year)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month0 + 1)
    }
}

/// Build the week rows for a month.
///
/// `month0` is 0-based and may be out of range; it is normalized the same
/// way date arithmetic would. The first row is padded with `None` before
/// the 1st and the last row after the final day.
pub fn build_month_grid(year: i32, month0: i32) -> Vec<WeekRow> {
    let key = MonthKey::new(year, month0);
    let Some(first) = key.first_day() else {
        return Vec::new();
    };

    let leading = first.weekday().num_days_from_sunday() as usize;
    let days_count = key.days_in_month() as usize;
    let total_rows = (leading + days_count).div_ceil(7);

    let mut grid = vec![[None; 7]; total_rows];
    for day_idx in 0..days_count {
        let cell = leading + day_idx;
        grid[cell / 7][cell % 7] = first.checked_add_signed(Duration::days(day_idx as i64));
    }
    grid
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as i64;
    date.checked_sub_signed(Duration::days(back)).unwrap_or(date)
}

/// Sunday of the week a grid row belongs to, `None` for an all-padding row
pub fn row_week_start(row: &WeekRow) -> Option<NaiveDate> {
    row.iter().flatten().next().map(|&date| week_start(date))
}
