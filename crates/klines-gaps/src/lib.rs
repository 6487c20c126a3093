//! Completeness checking for the klines candle pipeline.
//!
//! This crate finds missing time buckets in a [`CanonicalTable`]:
//!
//! - [`find_gaps`] - Runs of missing timestamps as `(start, end)` intervals
//! - [`missing_timestamps`] - Lazy iterator over individual missing timestamps
//! - [`group_runs`] - Merges consecutive missing timestamps into runs
//! - [`check_completeness`] - Counts, coverage and intervals in one report
//!
//! [`CanonicalTable`]: klines_types::CanonicalTable

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/klines/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod checker;
mod report;

pub use checker::{
    MissingTimestamps, check_alignment, find_gaps, find_gaps_for, group_runs,
    missing_timestamps, step_millis,
};
pub use report::{CompletenessReport, check_completeness, check_completeness_for};
