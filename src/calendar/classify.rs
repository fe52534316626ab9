//! Event tiering for week rows and day cells

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::month_grid::week_start;
use crate::types::CalendarEvent;

/// Display tier of an event within a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventTier {
    /// All-day, spanning two or more dates (packed into bar rows)
    MultiDay,
    /// All-day, a single date
    SingleDayAllDay,
    /// Has a time of day
    Timed,
}

impl EventTier {
    pub fn of(event: &CalendarEvent) -> Self {
        if !event.all_day {
            Self::Timed
        } else if event.is_multi_day() {
            Self::MultiDay
        } else {
            Self::SingleDayAllDay
        }
    }
}

/// Multi-day events overlapping the week that contains `date`, in packing
/// order: ascending start, then longer events first. The id is a final
/// tiebreak so the order does not depend on the input order.
pub fn multi_day_for_week(events: &[CalendarEvent], date: NaiveDate) -> Vec<&CalendarEvent> {
    let first = week_start(date);
    let last = first + Duration::days(6);

    let mut selected: Vec<&CalendarEvent> = events
        .iter()
        .filter(|evt| evt.is_multi_day() && evt.overlaps_dates(first, last))
        .collect();

    selected.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.effective_end().cmp(&a.effective_end()))
            .then_with(|| a.id.cmp(&b.id))
    });
    selected
}

/// Single-date all-day events on `date`
pub fn single_day_all_day_for_cell(events: &[CalendarEvent], date: NaiveDate) -> Vec<&CalendarEvent> {
    let mut selected: Vec<&CalendarEvent> = events
        .iter()
        .filter(|evt| EventTier::of(evt) == EventTier::SingleDayAllDay && evt.start_date() == date)
        .collect();
    selected.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    selected
}

/// Timed events that start and end on `date`, chronologically.
///
/// Events crossing midnight match no cell.
pub fn timed_for_cell(events: &[CalendarEvent], date: NaiveDate) -> Vec<&CalendarEvent> {
    let mut selected: Vec<&CalendarEvent> = events
        .iter()
        .filter(|evt| !evt.all_day && evt.start_date() == date && evt.end_date() == date)
        .collect();
    selected.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    selected
}
