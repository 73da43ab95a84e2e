//! # grid-engine
//!
//! Deterministic scheduling core for calendar day/week grids.
//!
//! The engine answers two questions for the UI layer, with pure functions and
//! no I/O: where each event block goes inside a day column when events overlap,
//! and which dates are visible after a user navigates.
//!
//! ## Modules
//!
//! - [`layout`] — Overlap clustering and column assignment (width/offset per event)
//! - [`navigation`] — Display modes and the view navigation state machine
//! - [`gesture`] — Swipe recognition for finished drag gestures
//! - [`date_range`] — Inclusive, iterable date intervals and week helpers
//! - [`error`] — Error types

pub mod date_range;
pub mod error;
pub mod gesture;
pub mod layout;
pub mod navigation;

pub use date_range::{DateRange, DateRangeIter};
pub use error::GridError;
pub use gesture::{DragDelta, SwipeConfig, SwipeDirection, DEFAULT_SWIPE_THRESHOLD};
pub use layout::{
    compute_day_layouts, compute_layouts, overlaps, ClusterId, EventLayout, TimeInterval,
};
pub use navigation::{default_mode, DayMode, DisplayMode, NavigationAction, NavigationState};
