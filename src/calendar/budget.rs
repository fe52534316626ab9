//! Per-cell visible slot allocation across event tiers.
//!
//! Multi-day bar rows are reserved first so a bar keeps the same lane in
//! every cell it crosses, then single-day all-day events, then timed
//! events. Whatever does not fit is summarized as a hidden count.

use serde::Serialize;

/// Default number of visible slots per cell
pub const DEFAULT_MAX_VISIBLE: usize = 3;

/// Largest accepted per-cell slot count
pub const MAX_VISIBLE_LIMIT: usize = 20;

/// Slot allocation for one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CellBudget {
    /// Bar rows reserved at the top of the cell
    pub reserved_rows: usize,
    /// Multi-day events covering the cell whose row fits in `reserved_rows`
    pub visible_multi_day: usize,
    pub visible_single_day: usize,
    pub visible_timed: usize,
    /// Events in the cell not shown ("+N more")
    pub hidden: usize,
}

impl CellBudget {
    /// Allocate `budget` slots for a cell.
    ///
    /// `multi_day_rows` holds the row index of each multi-day event
    /// covering the cell. Reserved rows are `min(highest row + 1, budget)`;
    /// the remaining slots go to single-day then timed events.
    pub fn allocate(multi_day_rows: &[usize], single_day: usize, timed: usize, budget: usize) -> Self {
        let reserved_rows = multi_day_rows
            .iter()
            .map(|&row| row + 1)
            .max()
            .unwrap_or(0)
            .min(budget);
        let visible_multi_day = multi_day_rows.iter().filter(|&&row| row < reserved_rows).count();

        let remaining = budget - reserved_rows;
        let visible_single_day = single_day.min(remaining);
        let visible_timed = timed.min(remaining - visible_single_day);

        let total = multi_day_rows.len() + single_day + timed;
        Self {
            reserved_rows,
            visible_multi_day,
            visible_single_day,
            visible_timed,
            hidden: total - visible_multi_day - visible_single_day - visible_timed,
        }
    }

    /// Events shown in the cell
    pub fn visible(&self) -> usize {
        self.visible_multi_day + self.visible_single_day + self.visible_timed
    }

    /// Every event that belongs to the cell
    pub fn total(&self) -> usize {
        self.visible() + self.hidden
    }

    /// Slot index of the first single-day entry, below the bar rows
    pub fn first_free_slot(&self) -> usize {
        self.reserved_rows
    }
}
