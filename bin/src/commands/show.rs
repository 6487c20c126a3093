//! Show command implementation.

use crate::display::{print_bars, print_table};
use anyhow::Result;
use klines_lib::prelude::*;

/// Print the last `rows` bars of a stored table.
///
/// Tables carrying the five OHLCV columns are printed as bars with their
/// range, body and direction. Other tables are printed column by column.
pub(crate) fn show(path: &std::path::Path, rows: usize) -> Result<()> {
    let table = load(path)?;
    let tail = table.tail(rows);
    match tail.ohlcv() {
        Some(bars) => print_bars(&bars),
        None => print_table(&tail),
    }
    println!("\n{} of {} bars", tail.len(), table.len());
    Ok(())
}
