//! Chronological event list grouped by day, served in pages

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::CalendarEvent;

/// Events per page
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaDay<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaPage<'a> {
    pub days: Vec<AgendaDay<'a>>,
    /// Events in this page
    pub shown: usize,
    pub total: usize,
    pub has_more: bool,
}

/// All events sorted by start
pub struct Agenda<'a> {
    sorted: Vec<&'a CalendarEvent>,
}

impl<'a> Agenda<'a> {
    pub fn new(events: &'a [CalendarEvent]) -> Self {
        let mut sorted: Vec<&'a CalendarEvent> = events.iter().collect();
        sorted.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        Self { sorted }
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Page `index` (0-based) of `PAGE_SIZE` events
    pub fn page(&self, index: usize) -> AgendaPage<'a> {
        let from = index.saturating_mul(PAGE_SIZE).min(self.sorted.len());
        let to = from.saturating_add(PAGE_SIZE).min(self.sorted.len());
        self.slice(from, to)
    }

    /// The first `count` events, for a list that grows as it scrolls
    pub fn first(&self, count: usize) -> AgendaPage<'a> {
        self.slice(0, count.min(self.sorted.len()))
    }

    fn slice(&self, from: usize, to: usize) -> AgendaPage<'a> {
        AgendaPage {
            days: group_by_day(&self.sorted[from..to]),
            shown: to - from,
            total: self.sorted.len(),
            has_more: to < self.sorted.len(),
        }
    }
}

/// Group consecutive events by start date
fn group_by_day<'a>(events: &[&'a CalendarEvent]) -> Vec<AgendaDay<'a>> {
    let mut days: Vec<AgendaDay<'a>> = Vec::new();
    for &event in events {
        match days.last_mut() {
            Some(day) if day.date == event.start_date() => day.events.push(event),
            _ => days.push(AgendaDay {
                date: event.start_date(),
                events: vec![event],
            }),
        }
    }
    days
}
