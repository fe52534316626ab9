//! Greedy first-fit row packing for multi-day event bars.
//!
//! Candidates arrive sorted by start (longer first on ties) and each is
//! placed in the lowest row whose events do not share a date with it.
//! For interval sets this uses no more rows than the largest number of
//! events active on a single day. Rows are assigned per week, so the same
//! event may land on different rows in consecutive weeks.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::classify::multi_day_for_week;
use super::month_grid::week_start;
use crate::types::CalendarEvent;

/// Row placement of one multi-day event within a week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowSlot<'a> {
    pub row: usize,
    pub event: &'a CalendarEvent,
}

/// Row assignment for every multi-day event overlapping one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekRowAssignment<'a> {
    week_start: NaiveDate,
    row_count: usize,
    slots: Vec<RowSlot<'a>>,
}

impl<'a> WeekRowAssignment<'a> {
    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(6)
    }

    /// Number of rows used
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Slots in packing order
    pub fn slots(&self) -> &[RowSlot<'a>] {
        &self.slots
    }

    /// Look up an event's row by id
    pub fn get(&self, id: &str) -> Option<&RowSlot<'a>> {
        self.slots.iter().find(|slot| slot.event.id == id)
    }

    /// Slots whose event covers `date`, ordered by row
    pub fn covering(&self, date: NaiveDate) -> Vec<RowSlot<'a>> {
        let mut slots: Vec<RowSlot<'a>> = self
            .slots
            .iter()
            .filter(|slot| slot.event.covers(date))
            .copied()
            .collect();
        slots.sort_by_key(|slot| slot.row);
        slots
    }
}

/// Assign rows to the multi-day events of the week containing `date`
pub fn assign_rows(events: &[CalendarEvent], date: NaiveDate) -> WeekRowAssignment<'_> {
    let candidates = multi_day_for_week(events, date);
    let rows = pack_rows(&candidates);
    let row_count = rows.iter().map(|&row| row + 1).max().unwrap_or(0);

    WeekRowAssignment {
        week_start: week_start(date),
        row_count,
        slots: candidates
            .into_iter()
            .zip(rows)
            .map(|(event, row)| RowSlot { row, event })
            .collect(),
    }
}

/// First-fit row index for each candidate, in the given order
pub fn pack_rows(candidates: &[&CalendarEvent]) -> Vec<usize> {
    let mut rows: Vec<Vec<(NaiveDate, NaiveDate)>> = Vec::new();
    let mut assigned = Vec::with_capacity(candidates.len());

    for event in candidates {
        let (start, end) = (event.start_date(), event.end_date());
        let free = rows.iter().position(|placed| {
            !placed
                .iter()
                .any(|&(other_start, other_end)| start <= other_end && end >= other_start)
        });

        let row = match free {
            Some(row) => row,
            None => {
                rows.push(Vec::new());
                rows.len() - 1
            }
        };
        rows[row].push((start, end));
        assigned.push(row);
    }

    assigned
}
