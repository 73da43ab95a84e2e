//! Inclusive calendar date intervals.
//!
//! A [`DateRange`] is the unit of "what is visible" in the grid: one day, a
//! Monday-to-Friday work week, or a full Monday-to-Sunday week. Ranges are
//! immutable values; navigation builds a new one on every transition.

use std::fmt;
use std::iter::FusedIterator;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// An inclusive interval of calendar dates with `start <= end_inclusive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange", into = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end_inclusive: NaiveDate,
}

/// Unvalidated wire shape of a [`DateRange`].
#[derive(Serialize, Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end_inclusive: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = GridError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        DateRange::new(raw.start, raw.end_inclusive)
    }
}

impl From<DateRange> for RawDateRange {
    fn from(range: DateRange) -> Self {
        RawDateRange {
            start: range.start,
            end_inclusive: range.end_inclusive,
        }
    }
}

impl DateRange {
    /// Create a range covering `start..=end_inclusive`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRange`] if `start` is after `end_inclusive`.
    pub fn new(start: NaiveDate, end_inclusive: NaiveDate) -> Result<Self> {
        if start > end_inclusive {
            return Err(GridError::InvalidRange {
                start,
                end: end_inclusive,
            });
        }
        Ok(DateRange {
            start,
            end_inclusive,
        })
    }

    /// A range containing exactly one day.
    pub fn single(day: NaiveDate) -> Self {
        DateRange {
            start: day,
            end_inclusive: day,
        }
    }

    /// The Monday-to-Sunday week containing `date`.
    ///
    /// Returns `None` for the partial weeks at either end of chrono's calendar.
    pub fn week_of(date: NaiveDate) -> Option<Self> {
        Self::monday_span(date, 6)
    }

    /// The Monday-to-Friday work week of the week containing `date`.
    ///
    /// For a Saturday or Sunday this is the work week that precedes it.
    /// Returns `None` when that work week is not representable.
    pub fn work_week_of(date: NaiveDate) -> Option<Self> {
        Self::monday_span(date, 4)
    }

    fn monday_span(date: NaiveDate, extra_days: u64) -> Option<Self> {
        let monday = monday_of(date)?;
        Some(DateRange {
            start: monday,
            end_inclusive: monday.checked_add_days(Days::new(extra_days))?,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end_inclusive(&self) -> NaiveDate {
        self.end_inclusive
    }

    /// Number of days in the range (always at least 1).
    pub fn len_days(&self) -> u64 {
        (self.end_inclusive - self.start).num_days() as u64 + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end_inclusive
    }

    /// Move both ends by `days` (negative moves backwards), keeping the length
    /// and weekday alignment.
    ///
    /// Returns `None` if either end would leave chrono's representable range.
    pub fn shift_days(&self, days: i64) -> Option<Self> {
        let shift = |date: NaiveDate| {
            if days >= 0 {
                date.checked_add_days(Days::new(days.unsigned_abs()))
            } else {
                date.checked_sub_days(Days::new(days.unsigned_abs()))
            }
        };
        Some(DateRange {
            start: shift(self.start)?,
            end_inclusive: shift(self.end_inclusive)?,
        })
    }

    /// Iterate the dates of the range in order. The iterator can be recreated
    /// any number of times.
    pub fn iter(&self) -> DateRangeIter {
        DateRangeIter {
            front: self.start,
            back: self.end_inclusive,
            finished: false,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end_inclusive)
    }
}

impl<'a> IntoIterator for &'a DateRange {
    type Item = NaiveDate;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> DateRangeIter {
        self.iter()
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> DateRangeIter {
        self.iter()
    }
}

/// Lazy iterator over the consecutive dates of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DateRangeIter {
    front: NaiveDate,
    back: NaiveDate,
    finished: bool,
}

impl Iterator for DateRangeIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.finished {
            return None;
        }
        let current = self.front;
        if current == self.back {
            self.finished = true;
        } else {
            match current.succ_opt() {
                Some(next) => self.front = next,
                None => self.finished = true,
            }
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.finished {
            0
        } else {
            (self.back - self.front).num_days() as usize + 1
        };
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for DateRangeIter {
    fn next_back(&mut self) -> Option<NaiveDate> {
        if self.finished {
            return None;
        }
        let current = self.back;
        if current == self.front {
            self.finished = true;
        } else {
            match current.pred_opt() {
                Some(prev) => self.back = prev,
                None => self.finished = true,
            }
        }
        Some(current)
    }
}

impl ExactSizeIterator for DateRangeIter {}

impl FusedIterator for DateRangeIter {}

/// The Monday that starts the ISO week containing `date`, or `None` if that
/// Monday precedes [`NaiveDate::MIN`].
pub fn monday_of(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}

/// Whether `date` falls on Monday through Friday.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
