//! Drag-to-select over date cells.
//!
//! Each pointer runs its own `idle -> dragging -> idle` machine. A drag
//! captures its pointer, so the release is delivered to the selector even
//! when it happens outside any cell, and the release commits the range.
//! [`DragSelector::release_all`] is the safety net for releases the front
//! end could not attribute to a pointer: it drops every drag without
//! committing.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::types::DateRange;

/// Front-end identifier of a pointer (mouse, touch point, pen)
pub type PointerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { anchor: NaiveDate, current: NaiveDate },
}

/// Whether `date` lies between `anchor` and `current`, in either order
pub fn in_drag_range(date: NaiveDate, anchor: NaiveDate, current: NaiveDate) -> bool {
    let (first, last) = if anchor <= current {
        (anchor, current)
    } else {
        (current, anchor)
    };
    first <= date && date <= last
}

#[derive(Debug, Default)]
pub struct DragSelector {
    active: HashMap<PointerId, (NaiveDate, NaiveDate)>,
}

impl DragSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, pointer: PointerId) -> DragState {
        match self.active.get(&pointer) {
            Some(&(anchor, current)) => DragState::Dragging { anchor, current },
            None => DragState::Idle,
        }
    }

    /// Pointer pressed on a date cell. Starts a drag unless a blocking
    /// overlay is open or this pointer is already dragging; returns
    /// whether a drag started.
    pub fn pointer_down(&mut self, pointer: PointerId, date: NaiveDate, overlay_open: bool) -> bool {
        if overlay_open || self.active.contains_key(&pointer) {
            return false;
        }
        self.active.insert(pointer, (date, date));
        log::debug!("event=drag_start pointer={} anchor={}", pointer, date);
        true
    }

    /// Pointer moved onto a date cell. Returns whether the range changed.
    pub fn pointer_enter(&mut self, pointer: PointerId, date: NaiveDate) -> bool {
        match self.active.get_mut(&pointer) {
            Some((_, current)) if *current != date => {
                *current = date;
                true
            }
            _ => false,
        }
    }

    /// Pointer released: commit the normalized range
    pub fn pointer_up(&mut self, pointer: PointerId) -> Option<DateRange> {
        let (anchor, current) = self.active.remove(&pointer)?;
        let range = DateRange::spanning(anchor, current);
        log::info!(
            "event=drag_commit pointer={} start={} end={} days={}",
            pointer,
            range.first_date(),
            range.last_date(),
            range.days()
        );
        Some(range)
    }

    /// Pointer cancelled by the platform; commits like a release
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> Option<DateRange> {
        self.pointer_up(pointer)
    }

    /// Return every pointer to idle without committing
    pub fn release_all(&mut self) {
        if !self.active.is_empty() {
            log::debug!("event=drag_reset pointers={}", self.active.len());
            self.active.clear();
        }
    }

    /// Whether `pointer` is captured by an active drag
    pub fn is_captured(&self, pointer: PointerId) -> bool {
        self.active.contains_key(&pointer)
    }

    /// Default scroll gestures are off while any drag is active
    pub fn gestures_suppressed(&self) -> bool {
        !self.active.is_empty()
    }

    /// Whether `date` is inside any active drag, for highlighting
    pub fn is_in_range(&self, date: NaiveDate) -> bool {
        self.active
            .values()
            .any(|&(anchor, current)| in_drag_range(date, anchor, current))
    }
}
