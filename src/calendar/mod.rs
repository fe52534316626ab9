//! Month-grid layout engine.
//!
//! Everything here is synchronous and free of I/O. Callers hand in the
//! full event collection and get back render instructions; the scroll
//! window and drag selector are small state machines driven by the front
//! end.

pub mod budget;
pub mod classify;
pub mod drag;
pub mod layout;
pub mod month_grid;
pub mod packing;
pub mod scroll;

pub use budget::{CellBudget, DEFAULT_MAX_VISIBLE, MAX_VISIBLE_LIMIT};
pub use classify::EventTier;
pub use drag::{DragSelector, DragState, PointerId};
pub use layout::{build_month_layout, BarSegment, CellLayout, MonthLayout, SegmentKind, Slot, WeekLayout};
pub use month_grid::{build_month_grid, week_start, MonthKey, WeekRow};
pub use packing::{assign_rows, WeekRowAssignment};
pub use scroll::{DisplayWindow, Extension, ScrollMetrics, ScrollWindow, WindowConfig};
