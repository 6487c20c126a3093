//! Completeness summary for a table.

use chrono::TimeDelta;
use klines_types::{CanonicalTable, GapError, Interval, MissingInterval};
use serde::Serialize;

use crate::checker::{find_gaps, interval_duration, step_millis};

/// Summary of how much of the expected grid a table covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessReport {
    /// Grid step in milliseconds.
    pub step_ms: i64,
    /// First open time, if any.
    pub first: Option<i64>,
    /// Last open time, if any.
    pub last: Option<i64>,
    /// Number of grid points between first and last, inclusive.
    pub expected: usize,
    /// Number of rows present.
    pub present: usize,
    /// Runs of missing timestamps.
    pub intervals: Vec<MissingInterval>,
}

impl CompletenessReport {
    /// Returns the number of missing grid points.
    #[must_use]
    pub const fn missing(&self) -> usize {
        self.expected.saturating_sub(self.present)
    }

    /// Returns true if no grid point is missing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns the present fraction of the expected grid, in `[0, 1]`.
    ///
    /// An empty table counts as fully covered.
    #[must_use]
    pub fn coverage(&self) -> f64 {
        if self.expected == 0 {
            1.0
        } else {
            self.present as f64 / self.expected as f64
        }
    }
}

/// Builds a [`CompletenessReport`] for the table.
///
/// # Errors
///
/// Returns the same errors as [`find_gaps`]. The frequency is always
/// validated, even for tables with fewer than two rows.
pub fn check_completeness(
    table: &CanonicalTable,
    frequency: TimeDelta,
) -> Result<CompletenessReport, GapError> {
    let step_ms = step_millis(frequency)?;
    let intervals = find_gaps(table, frequency)?;

    let expected = match (table.first_time(), table.last_time()) {
        (Some(first), Some(last)) => {
            usize::try_from((i128::from(last) - i128::from(first)) / i128::from(step_ms) + 1)
                .unwrap_or(usize::MAX)
        }
        _ => 0,
    };

    Ok(CompletenessReport {
        step_ms,
        first: table.first_time(),
        last: table.last_time(),
        expected,
        present: table.len(),
        intervals,
    })
}

/// Builds a [`CompletenessReport`] using a kline interval as the frequency.
///
/// # Errors
///
/// Returns [`GapError::InvalidFrequency`] for `1M`, plus any error from
/// [`check_completeness`].
pub fn check_completeness_for(
    table: &CanonicalTable,
    interval: Interval,
) -> Result<CompletenessReport, GapError> {
    check_completeness(table, interval_duration(interval)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use klines_types::{Column, OPEN_TIME};

    const STEP: i64 = 60_000;

    fn table_with(index: Vec<i64>) -> CanonicalTable {
        let values = vec![0.5; index.len()];
        CanonicalTable::new(OPEN_TIME, index, vec![Column::new("Open", values)]).unwrap()
    }

    #[test]
    fn test_report_counts() {
        let index = vec![0, STEP, 4 * STEP, 5 * STEP];
        let report = check_completeness(&table_with(index), TimeDelta::minutes(1)).unwrap();

        assert_eq!(report.step_ms, STEP);
        assert_eq!(report.expected, 6);
        assert_eq!(report.present, 4);
        assert_eq!(report.missing(), 2);
        assert_eq!(report.intervals, vec![MissingInterval::new(2 * STEP, 3 * STEP)]);
        assert!(!report.is_complete());
        assert_relative_eq!(report.coverage(), 4.0 / 6.0);
    }

    #[test]
    fn test_report_complete() {
        let report =
            check_completeness_for(&table_with(vec![0, STEP, 2 * STEP]), Interval::Minute1)
                .unwrap();
        assert!(report.is_complete());
        assert_eq!(report.missing(), 0);
        assert_relative_eq!(report.coverage(), 1.0);
    }

    #[test]
    fn test_report_empty_table() {
        let report = check_completeness(&table_with(vec![]), TimeDelta::minutes(1)).unwrap();
        assert_eq!(report.expected, 0);
        assert_eq!(report.first, None);
        assert_relative_eq!(report.coverage(), 1.0);
    }

    #[test]
    fn test_report_validates_frequency() {
        let result = check_completeness(&table_with(vec![0]), TimeDelta::zero());
        assert!(matches!(result, Err(GapError::InvalidFrequency(_))));
    }
}
