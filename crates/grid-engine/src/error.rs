//! Error types for grid-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid navigation action: {0}")]
    InvalidAction(String),

    #[error("Invalid swipe threshold: {0} (must be a finite, non-negative number)")]
    InvalidThreshold(String),
}

pub type Result<T> = std::result::Result<T, GridError>;
