//! Display windows.

use chrono::{DateTime, Utc};

/// Half-open range of instants, `[start, end)`, that a caller wants
/// instances for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// A window that cannot contain anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// ## Summary
    /// Tests whether the interval `[start, end)` overlaps this window.
    ///
    /// An occurrence ending exactly at `self.start`, or starting exactly at
    /// `self.end`, belongs to the adjacent window instead.
    #[must_use]
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        end > self.start && start < self.end
    }
}
