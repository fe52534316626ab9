//! Render instructions for a month: week rows, bar segments, visible
//! slots and overflow counts per cell.
//!
//! Layouts borrow the event collection and are rebuilt from scratch on
//! every change. The same input always yields the same layout.

use chrono::NaiveDate;
use serde::Serialize;

use super::budget::CellBudget;
use super::classify::{single_day_all_day_for_cell, timed_for_cell};
use super::month_grid::{build_month_grid, row_week_start, MonthKey, WeekRow};
use super::packing::{assign_rows, WeekRowAssignment};
use crate::types::CalendarEvent;

/// Maximum colour dots in a compact cell before "+N"
pub const COMPACT_DOT_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// The event starts on this cell's date
    Start,
    /// The event started on an earlier date
    Continue,
}

/// The part of a multi-day bar drawn in one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BarSegment<'a> {
    pub row: usize,
    pub kind: SegmentKind,
    /// Cells from this one to the event's last date inside the week
    pub span: usize,
    /// Whether the title is drawn here (event start, or first cell of the
    /// visible row)
    pub labeled: bool,
    pub event: &'a CalendarEvent,
}

/// What occupies one vertical slot of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    /// Reserved bar row with no bar on this date
    Gap,
    Bar(BarSegment<'a>),
    AllDay(&'a CalendarEvent),
    Timed(&'a CalendarEvent),
}

impl<'a> Slot<'a> {
    pub fn event(&self) -> Option<&'a CalendarEvent> {
        match *self {
            Slot::Gap => None,
            Slot::Bar(segment) => Some(segment.event),
            Slot::AllDay(event) | Slot::Timed(event) => Some(event),
        }
    }
}

/// Colour dots for the compact cell rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompactSummary<'a> {
    pub dots: Vec<&'a str>,
    pub overflow: usize,
}

/// Render instructions for one dated cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellLayout<'a> {
    pub date: NaiveDate,
    /// 0 = Sunday
    pub column: usize,
    /// Visible bar segments, by row
    pub bars: Vec<BarSegment<'a>>,
    /// Visible single-day all-day events
    pub all_day: Vec<&'a CalendarEvent>,
    /// Visible timed events, chronological
    pub timed: Vec<&'a CalendarEvent>,
    pub budget: CellBudget,
    #[serde(skip)]
    events: Vec<&'a CalendarEvent>,
}

impl<'a> CellLayout<'a> {
    /// Every event in the cell, visible or not, in tier order
    pub fn events(&self) -> &[&'a CalendarEvent] {
        &self.events
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Visible slots from top to bottom
    pub fn slots(&self) -> Vec<Slot<'a>> {
        let mut slots: Vec<Slot<'a>> = (0..self.budget.reserved_rows)
            .map(|row| {
                self.bars
                    .iter()
                    .find(|segment| segment.row == row)
                    .map_or(Slot::Gap, |segment| Slot::Bar(*segment))
            })
            .collect();
        slots.extend(self.all_day.iter().copied().map(Slot::AllDay));
        slots.extend(self.timed.iter().copied().map(Slot::Timed));
        slots
    }

    pub fn compact_summary(&self) -> CompactSummary<'a> {
        CompactSummary {
            dots: self
                .events
                .iter()
                .take(COMPACT_DOT_LIMIT)
                .map(|event| event.color.as_str())
                .collect(),
            overflow: self.events.len().saturating_sub(COMPACT_DOT_LIMIT),
        }
    }
}

/// One week row of a month card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekLayout<'a> {
    pub week_start: NaiveDate,
    /// Bar rows the packer used for the whole week
    pub row_count: usize,
    /// Seven entries, `None` for padding outside the month
    pub cells: Vec<Option<CellLayout<'a>>>,
}

/// All week rows of one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLayout<'a> {
    pub key: MonthKey,
    pub budget: usize,
    pub weeks: Vec<WeekLayout<'a>>,
}

impl<'a> MonthLayout<'a> {
    pub fn cells(&self) -> impl Iterator<Item = &CellLayout<'a>> {
        self.weeks.iter().flat_map(|week| week.cells.iter().flatten())
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CellLayout<'a>> {
        self.cells().find(|cell| cell.date == date)
    }
}

/// Lay out a month against the full event collection
pub fn build_month_layout(events: &[CalendarEvent], key: MonthKey, budget: usize) -> MonthLayout<'_> {
    let weeks = build_month_grid(key.year, key.month0 as i32)
        .iter()
        .filter_map(|row| build_week_layout(events, row, budget))
        .collect();

    MonthLayout { key, budget, weeks }
}

/// Lay out one grid row; `None` for a row with no dates
pub fn build_week_layout<'a>(events: &'a [CalendarEvent], row: &WeekRow, budget: usize) -> Option<WeekLayout<'a>> {
    let week_start = row_week_start(row)?;
    let assignment = assign_rows(events, week_start);

    let cells = row
        .iter()
        .enumerate()
        .map(|(column, date)| {
            let previous_blank = column == 0 || row[column - 1].is_none();
            date.map(|date| build_cell(events, &assignment, date, column, previous_blank, budget))
        })
        .collect();

    Some(WeekLayout {
        week_start,
        row_count: assignment.row_count(),
        cells,
    })
}

fn build_cell<'a>(
    events: &'a [CalendarEvent],
    assignment: &WeekRowAssignment<'a>,
    date: NaiveDate,
    column: usize,
    previous_blank: bool,
    budget: usize,
) -> CellLayout<'a> {
    let covering = assignment.covering(date);
    let all_day = single_day_all_day_for_cell(events, date);
    let timed = timed_for_cell(events, date);

    let rows: Vec<usize> = covering.iter().map(|slot| slot.row).collect();
    let allocation = CellBudget::allocate(&rows, all_day.len(), timed.len(), budget);

    let mut everything: Vec<&'a CalendarEvent> = covering.iter().map(|slot| slot.event).collect();
    everything.extend(all_day.iter().copied());
    everything.extend(timed.iter().copied());

    let bars = covering
        .iter()
        .filter(|slot| slot.row < allocation.reserved_rows)
        .map(|slot| {
            let starts_here = slot.event.start_date() == date;
            let last = slot.event.end_date().min(assignment.week_end());
            BarSegment {
                row: slot.row,
                kind: if starts_here {
                    SegmentKind::Start
                } else {
                    SegmentKind::Continue
                },
                span: ((last - date).num_days() + 1).max(1) as usize,
                labeled: starts_here || previous_blank,
                event: slot.event,
            }
        })
        .collect();

    CellLayout {
        date,
        column,
        bars,
        all_day: all_day.into_iter().take(allocation.visible_single_day).collect(),
        timed: timed.into_iter().take(allocation.visible_timed).collect(),
        budget: allocation,
        events: everything,
    }
}

/// Dates shown in a layout, first to last
pub fn layout_dates(layout: &MonthLayout<'_>) -> Vec<NaiveDate> {
    layout.cells().map(|cell| cell.date).collect()
}
