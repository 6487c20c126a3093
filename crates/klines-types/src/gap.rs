//! Missing interval representation.

use serde::{Deserialize, Serialize};

use crate::time::format_ms;

/// A maximal run of expected but absent timestamps.
///
/// Both bounds are inclusive and use the table's index unit (milliseconds).
/// A single missing bucket has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissingInterval {
    /// First missing timestamp.
    pub start: i64,
    /// Last missing timestamp.
    pub end: i64,
}

impl MissingInterval {
    /// Creates a missing interval.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Creates an interval covering a single timestamp.
    #[must_use]
    pub const fn single(time: i64) -> Self {
        Self {
            start: time,
            end: time,
        }
    }

    /// Returns the number of missing buckets for a grid step in milliseconds.
    ///
    /// Returns `None` if `step_ms` is not positive or `end` precedes `start`.
    #[must_use]
    pub fn len(&self, step_ms: i64) -> Option<u64> {
        if step_ms <= 0 {
            return None;
        }
        // i128 holds the span of any pair of i64 timestamps
        let span = i128::from(self.end) - i128::from(self.start);
        if span < 0 {
            return None;
        }
        u64::try_from(span / i128::from(step_ms) + 1).ok()
    }

    /// Returns the interval as a `(start, end)` pair.
    #[must_use]
    pub const fn as_tuple(&self) -> (i64, i64) {
        (self.start, self.end)
    }
}

impl From<(i64, i64)> for MissingInterval {
    fn from((start, end): (i64, i64)) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for MissingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", format_ms(self.start))
        } else {
            write!(f, "{} .. {}", format_ms(self.start), format_ms(self.end))
        }
    }
}
