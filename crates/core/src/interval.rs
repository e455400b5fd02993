use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{DentalError, DentalResult};

/// `minutes` as a `Duration`, failing instead of panicking when out of range.
pub fn minutes(minutes: i64) -> DentalResult<Duration> {
    Duration::try_minutes(minutes).ok_or_else(|| {
        DentalError::InvalidDuration(format!("{} minutes is out of range", minutes))
    })
}

/// `start + minutes`, or `InvalidDuration` when the result leaves the calendar.
pub fn add_minutes(start: NaiveDateTime, amount: i64) -> DentalResult<NaiveDateTime> {
    start.checked_add_signed(minutes(amount)?).ok_or_else(|| {
        DentalError::InvalidDuration(format!("{} minutes after {} is out of range", amount, start))
    })
}

/// Half-open interval `[start, end)` on the clinic's wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn starting_at(start: NaiveDateTime, minutes: i64) -> DentalResult<Self> {
        Ok(Self::new(start, add_minutes(start, minutes)?))
    }

    /// `[s1, e1)` and `[s2, e2)` overlap iff `s1 < e2 && s2 < e1`.
    /// Ranges that merely touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}
