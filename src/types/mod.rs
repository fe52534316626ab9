//! Type definitions for gridcal

mod error;
mod event;
mod range;

pub use error::*;
pub use event::*;
pub use range::*;

/// Event source loading warning types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// Failed to open or read an event file
    LoadFailed(String),
    /// Event file was not a valid JSON array of events
    Corrupted(String),
    /// Records skipped because their dates could not be resolved
    SkippedEvents(usize),
}
