//! Gaps command implementation.

use crate::display::{ReportFormat, print_report};
use anyhow::{Context, Result};
use klines_lib::prelude::*;

/// Load a stored table and report its missing candles.
pub(crate) fn gaps(path: &std::path::Path, interval: Interval, format: ReportFormat) -> Result<()> {
    let table = load(path)?;
    let report = check_completeness_for(&table, interval)
        .with_context(|| format!("Cannot check {} against {interval}", path.display()))?;
    print_report(&report, format)
}
