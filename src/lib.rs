//! gridcal: continuously scrollable month-grid calendar
//!
//! [`calendar`] is the pure layout engine (grid, row packing, per-cell
//! budgets, scroll window, drag selection). [`services`] loads and watches
//! event files, [`tui`] draws it all in the terminal.

pub mod calendar;
pub mod cli;
pub mod logging;
pub mod services;
pub mod tui;
pub mod types;
