//! Terminal front end

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::{run, App, CalendarCallbacks, LogCallbacks, RunOptions};
