//! Horizontal swipe recognition for the day/week grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// Minimum horizontal drag, in the UI layer's drag units, that counts as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 100.0;

/// Which way a recognized swipe moves the visible range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwipeDirection {
    /// Later dates (finger moved right to left).
    Next,
    /// Earlier dates (finger moved left to right).
    Previous,
}

impl SwipeDirection {
    /// `1` for [`Next`](SwipeDirection::Next), `-1` for [`Previous`](SwipeDirection::Previous).
    pub fn sign(self) -> i64 {
        match self {
            SwipeDirection::Next => 1,
            SwipeDirection::Previous => -1,
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SwipeDirection::Next => "next",
            SwipeDirection::Previous => "prev",
        })
    }
}

impl FromStr for SwipeDirection {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, GridError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" | "forward" | "left" => Ok(SwipeDirection::Next),
            "prev" | "previous" | "back" | "right" => Ok(SwipeDirection::Previous),
            other => Err(GridError::InvalidAction(format!(
                "unknown swipe direction '{}'",
                other
            ))),
        }
    }
}

/// Net displacement of a finished drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragDelta {
    pub dx: f32,
    pub dy: f32,
}

impl DragDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        DragDelta { dx, dy }
    }
}

/// Swipe recognition settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// The horizontal drag must strictly exceed this magnitude.
    pub threshold: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        SwipeConfig {
            threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

impl SwipeConfig {
    pub fn with_threshold(threshold: f32) -> Self {
        SwipeConfig { threshold }
    }

    /// Like [`with_threshold`](Self::with_threshold), for thresholds taken
    /// from user input.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidThreshold`] for a negative, infinite or NaN
    /// threshold. A negative one would turn every horizontal drag into a swipe.
    pub fn try_with_threshold(threshold: f32) -> Result<Self, GridError> {
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(GridError::InvalidThreshold(threshold.to_string()));
        }
        Ok(SwipeConfig { threshold })
    }

    /// Classify a finished drag.
    ///
    /// A swipe is recognized only when `|dx|` is strictly greater than the
    /// threshold and strictly greater than `|dy|`. A drag of exactly the
    /// threshold, or one that is mostly vertical, is not a swipe. Non-finite
    /// deltas never are.
    pub fn recognize(&self, delta: DragDelta) -> Option<SwipeDirection> {
        if !(delta.dx.is_finite() && delta.dy.is_finite()) {
            return None;
        }
        let (horizontal, vertical) = (delta.dx.abs(), delta.dy.abs());
        if !(horizontal > self.threshold && horizontal > vertical) {
            return None;
        }
        if delta.dx < 0.0 {
            Some(SwipeDirection::Next)
        } else {
            Some(SwipeDirection::Previous)
        }
    }
}
