//! Intervals command implementation.

use klines_lib::Interval;

/// List the supported kline intervals with their lengths.
pub(crate) fn list_intervals() {
    println!("{:<10} {:>12}", "INTERVAL", "SECONDS");
    println!("{}", "-".repeat(23));

    for interval in Interval::all() {
        match interval.seconds() {
            Some(seconds) => println!("{:<10} {:>12}", interval.as_str(), seconds),
            None => println!("{:<10} {:>12}", interval.as_str(), "calendar"),
        }
    }
}
