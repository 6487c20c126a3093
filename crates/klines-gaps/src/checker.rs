//! Missing timestamp detection and run grouping.

use chrono::TimeDelta;
use klines_types::{CanonicalTable, GapError, Interval, MissingInterval};
use tracing::{debug, warn};

/// Converts a sampling frequency to a grid step in milliseconds.
///
/// # Errors
///
/// Returns [`GapError::InvalidFrequency`] if the frequency is not strictly
/// positive or is not a whole number of milliseconds.
pub fn step_millis(frequency: TimeDelta) -> Result<i64, GapError> {
    if frequency <= TimeDelta::zero() {
        return Err(GapError::InvalidFrequency(format!(
            "{frequency} is not strictly positive"
        )));
    }
    if frequency.subsec_nanos() % 1_000_000 != 0 {
        return Err(GapError::InvalidFrequency(format!(
            "{frequency} is not a whole number of milliseconds"
        )));
    }
    Ok(frequency.num_milliseconds())
}

/// Checks that every index value lies on the grid `origin + k * step`.
///
/// The origin is the first (smallest) index value.
///
/// # Errors
///
/// Returns [`GapError::MisalignedIndex`] for the first off-grid value.
pub fn check_alignment(index: &[i64], step: i64) -> Result<(), GapError> {
    let Some(&origin) = index.first() else {
        return Ok(());
    };
    // i128 keeps the offset exact for any pair of i64 timestamps
    match index
        .iter()
        .find(|&&t| (i128::from(t) - i128::from(origin)) % i128::from(step) != 0)
    {
        Some(&time) => Err(GapError::MisalignedIndex { time, origin, step }),
        None => Ok(()),
    }
}

/// Lazy iterator over grid timestamps absent from a sorted index.
///
/// Walks the expected grid `first, first + step, ..., last` and the actual
/// index in lockstep, yielding grid points that the index skips.
#[derive(Debug, Clone)]
pub struct MissingTimestamps<'a> {
    index: &'a [i64],
    next_actual: usize,
    cursor: Option<i64>,
    last: i64,
    step: i64,
}

impl<'a> MissingTimestamps<'a> {
    fn new(index: &'a [i64], step: i64) -> Self {
        Self {
            index,
            next_actual: 0,
            cursor: index.first().copied(),
            last: index.last().copied().unwrap_or(i64::MIN),
            step,
        }
    }
}

impl Iterator for MissingTimestamps<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expected = self.cursor?;
            self.cursor = expected
                .checked_add(self.step)
                .filter(|next| *next <= self.last);

            while self
                .index
                .get(self.next_actual)
                .is_some_and(|&actual| actual < expected)
            {
                self.next_actual += 1;
            }

            if self.index.get(self.next_actual) == Some(&expected) {
                self.next_actual += 1;
                continue;
            }
            return Some(expected);
        }
    }
}

/// Returns the expected-grid timestamps absent from the table, ascending.
///
/// # Errors
///
/// Returns [`GapError::InvalidFrequency`] or [`GapError::MisalignedIndex`].
pub fn missing_timestamps(
    table: &CanonicalTable,
    frequency: TimeDelta,
) -> Result<MissingTimestamps<'_>, GapError> {
    let step = step_millis(frequency)?;
    check_alignment(table.index(), step)?;
    Ok(MissingTimestamps::new(table.index(), step))
}

/// Merges ascending missing timestamps into maximal consecutive runs.
///
/// Two timestamps share a run only when the second is exactly one `step`
/// after the first. The last pending run is always emitted, so a single
/// missing timestamp `t` yields `(t, t)`.
pub fn group_runs(missing: impl IntoIterator<Item = i64>, step: i64) -> Vec<MissingInterval> {
    let mut intervals = Vec::new();
    let mut pending: Option<MissingInterval> = None;

    for time in missing {
        pending = Some(match pending {
            Some(run) if run.end.checked_add(step) == Some(time) => {
                MissingInterval::new(run.start, time)
            }
            Some(run) => {
                intervals.push(run);
                MissingInterval::single(time)
            }
            None => MissingInterval::single(time),
        });
    }

    if let Some(run) = pending {
        intervals.push(run);
    }
    intervals
}

/// Finds the runs of missing timestamps in a table.
///
/// The expected grid spans the table's first to last open time in
/// `frequency` steps. Tables with fewer than two rows are trivially
/// complete and yield no intervals for any frequency.
///
/// # Errors
///
/// - [`GapError::InvalidFrequency`] if `frequency` is not a positive whole
///   number of milliseconds
/// - [`GapError::MisalignedIndex`] if an open time is off the grid
pub fn find_gaps(
    table: &CanonicalTable,
    frequency: TimeDelta,
) -> Result<Vec<MissingInterval>, GapError> {
    if table.len() < 2 {
        return Ok(Vec::new());
    }

    let step = step_millis(frequency)?;
    let gaps = group_runs(missing_timestamps(table, frequency)?, step);

    if gaps.is_empty() {
        debug!(rows = table.len(), step_ms = step, "series is complete");
    } else {
        warn!(
            rows = table.len(),
            step_ms = step,
            intervals = gaps.len(),
            "series has missing candles"
        );
    }
    Ok(gaps)
}

/// Finds gaps using a kline interval as the frequency.
///
/// # Errors
///
/// Returns [`GapError::InvalidFrequency`] for `1M`, which has no fixed
/// length, plus any error from [`find_gaps`].
pub fn find_gaps_for(
    table: &CanonicalTable,
    interval: Interval,
) -> Result<Vec<MissingInterval>, GapError> {
    find_gaps(table, interval_duration(interval)?)
}

pub(crate) fn interval_duration(interval: Interval) -> Result<TimeDelta, GapError> {
    interval.duration().ok_or_else(|| {
        GapError::InvalidFrequency(format!("interval {interval} has no fixed length"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use klines_types::{Column, OPEN_TIME};

    const STEP: i64 = 15 * 60 * 1000;
    const ORIGIN: i64 = 1_704_067_200_000;

    fn t(k: i64) -> i64 {
        ORIGIN + k * STEP
    }

    fn table_with(index: Vec<i64>) -> CanonicalTable {
        let values = vec![1.0; index.len()];
        CanonicalTable::new(OPEN_TIME, index, vec![Column::new("Close", values)]).unwrap()
    }

    /// A 15-minute grid of `n` points with the listed positions removed.
    fn grid_without(n: i64, missing: &[i64]) -> CanonicalTable {
        table_with((0..n).filter(|k| !missing.contains(k)).map(t).collect())
    }

    fn fifteen_minutes() -> TimeDelta {
        TimeDelta::minutes(15)
    }

    #[test]
    fn test_complete_series() {
        let table = grid_without(10, &[]);
        assert!(find_gaps(&table, fifteen_minutes()).unwrap().is_empty());
    }

    #[test]
    fn test_single_gap() {
        // 10 expected points, the 5th (position 4) missing
        let table = grid_without(10, &[4]);
        let gaps = find_gaps(&table, fifteen_minutes()).unwrap();
        assert_eq!(gaps, vec![MissingInterval::new(t(4), t(4))]);
    }

    #[test]
    fn test_multi_gap_grouping() {
        let table = grid_without(20, &[3, 4, 5, 10]);
        let gaps = find_gaps(&table, fifteen_minutes()).unwrap();
        assert_eq!(
            gaps,
            vec![
                MissingInterval::new(t(3), t(5)),
                MissingInterval::new(t(10), t(10)),
            ]
        );
    }

    #[test]
    fn test_adjacent_single_gaps_stay_separate() {
        let table = grid_without(8, &[2, 4]);
        let gaps = find_gaps(&table, fifteen_minutes()).unwrap();
        assert_eq!(
            gaps,
            vec![MissingInterval::single(t(2)), MissingInterval::single(t(4))]
        );
    }

    #[test]
    fn test_single_row_is_complete() {
        let table = table_with(vec![ORIGIN]);
        assert!(find_gaps(&table, fifteen_minutes()).unwrap().is_empty());
        assert!(find_gaps(&table, TimeDelta::zero()).unwrap().is_empty());
        assert!(find_gaps(&table, TimeDelta::minutes(-5)).unwrap().is_empty());
        assert!(find_gaps(&table_with(vec![]), fifteen_minutes()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_frequency() {
        let table = grid_without(3, &[]);
        assert!(matches!(
            find_gaps(&table, TimeDelta::zero()),
            Err(GapError::InvalidFrequency(_))
        ));
        assert!(matches!(
            find_gaps(&table, TimeDelta::minutes(-15)),
            Err(GapError::InvalidFrequency(_))
        ));
        assert!(matches!(
            find_gaps(&table, TimeDelta::microseconds(1500)),
            Err(GapError::InvalidFrequency(_))
        ));
    }

    #[test]
    fn test_misaligned_index_rejected() {
        let table = table_with(vec![t(0), t(1), t(2) + 60_000, t(4)]);
        assert_eq!(
            find_gaps(&table, fifteen_minutes()),
            Err(GapError::MisalignedIndex {
                time: t(2) + 60_000,
                origin: t(0),
                step: STEP,
            })
        );
    }

    #[test]
    fn test_coarser_frequency_than_data_is_misaligned() {
        let table = grid_without(4, &[]);
        assert!(matches!(
            find_gaps(&table, TimeDelta::hours(1)),
            Err(GapError::MisalignedIndex { .. })
        ));
    }

    #[test]
    fn test_missing_timestamps_iterator() {
        let table = grid_without(7, &[1, 2, 5]);
        let missing: Vec<_> = missing_timestamps(&table, fifteen_minutes())
            .unwrap()
            .collect();
        assert_eq!(missing, vec![t(1), t(2), t(5)]);
    }

    #[test]
    fn test_group_runs() {
        assert!(group_runs(Vec::new(), 10).is_empty());
        assert_eq!(group_runs([30], 10), vec![MissingInterval::single(30)]);
        assert_eq!(
            group_runs([10, 20, 30, 50, 70, 80], 10),
            vec![
                MissingInterval::new(10, 30),
                MissingInterval::single(50),
                MissingInterval::new(70, 80),
            ]
        );
    }

    #[test]
    fn test_find_gaps_for_interval() {
        let table = grid_without(5, &[2]);
        let gaps = find_gaps_for(&table, Interval::Minute15).unwrap();
        assert_eq!(gaps, vec![MissingInterval::single(t(2))]);
        assert!(matches!(
            find_gaps_for(&table, Interval::Month1),
            Err(GapError::InvalidFrequency(_))
        ));
    }

    #[test]
    fn test_step_millis() {
        assert_eq!(step_millis(fifteen_minutes()), Ok(STEP));
        assert_eq!(step_millis(TimeDelta::milliseconds(1)), Ok(1));
    }
}
