//! Display utilities and argument parsing for the klines CLI.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate};
use clap::ValueEnum;
use directories::ProjectDirs;
use klines_lib::time::format_ms;
use klines_lib::{CanonicalTable, CompletenessReport, Interval, Ohlcv, OutputFormat};
use std::path::PathBuf;

/// Export format for stored tables.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum ExportFormat {
    Csv,
    Tsv,
    Json,
    Ndjson,
}

impl From<ExportFormat> for OutputFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Csv => Self::Csv,
            ExportFormat::Tsv => Self::Tsv,
            ExportFormat::Json => Self::Json,
            ExportFormat::Ndjson => Self::Ndjson,
        }
    }
}

/// Format of the completeness report.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum ReportFormat {
    Text,
    Json,
}

/// Returns the directory holding default containers.
///
/// - Linux: `~/.local/share/klines/`
/// - macOS: `~/Library/Application Support/klines/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\klines\`
///
/// Falls back to `~/.klines/`.
pub(crate) fn data_dir() -> PathBuf {
    ProjectDirs::from("", "", "klines").map_or_else(dirs_fallback, |proj_dirs| {
        proj_dirs.data_dir().to_path_buf()
    })
}

fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".klines")
}

/// Default container file name for a symbol and interval.
pub(crate) fn container_name(symbol: &str, interval: Interval) -> String {
    format!("{}_{}.parquet", symbol.to_lowercase(), interval)
}

/// Parses a time argument into milliseconds since the Unix epoch.
///
/// Accepts a raw millisecond count, an RFC 3339 timestamp or a UTC date.
pub(crate) fn parse_time(s: &str) -> Result<i64> {
    if let Ok(ms) = s.parse::<i64>() {
        return Ok(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .with_context(|| format!("Invalid date: {s}"))?;
        return Ok(midnight.and_utc().timestamp_millis());
    }
    bail!("Invalid time: {s}. Use milliseconds, YYYY-MM-DD or RFC 3339")
}

/// Prints a table with one row per bar.
pub(crate) fn print_table(table: &CanonicalTable) {
    print!("{:<25}", table.index_label());
    for name in table.column_names() {
        print!(" {name:>16}");
    }
    println!();
    println!("{}", "-".repeat(25 + 17 * table.columns().len()));

    for row in table.rows() {
        print!("{:<25}", format_ms(row.time()));
        for value in row.values() {
            print!(" {value:>16}");
        }
        println!();
    }
}

/// Returns the direction marker for a bar.
pub(crate) fn direction(bar: &Ohlcv) -> &'static str {
    if bar.is_bullish() {
        "up"
    } else if bar.is_bearish() {
        "down"
    } else {
        "flat"
    }
}

/// Prints OHLCV bars with their range, body and direction.
pub(crate) fn print_bars(bars: &[Ohlcv]) {
    println!(
        "{:<25} {:>14} {:>14} {:>14} {:>14} {:>16} {:>12} {:>12} {:>5}",
        "OPEN TIME", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME", "RANGE", "BODY", "DIR"
    );
    println!("{}", "-".repeat(148));

    for bar in bars {
        println!(
            "{:<25} {:>14} {:>14} {:>14} {:>14} {:>16} {:>12.6} {:>12.6} {:>5}",
            format_ms(bar.open_time),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume,
            bar.range(),
            bar.body(),
            direction(bar)
        );
    }
}

/// Prints a completeness report.
pub(crate) fn print_report(report: &CompletenessReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        ReportFormat::Text => {
            let span = match (report.first, report.last) {
                (Some(first), Some(last)) => format!("{} -> {}", format_ms(first), format_ms(last)),
                _ => "empty".to_string(),
            };
            println!("Span:     {span}");
            println!("Bars:     {} of {} expected", report.present, report.expected);
            println!("Coverage: {:.2}%", report.coverage() * 100.0);

            if report.is_complete() {
                println!("No missing candles.");
            } else {
                println!(
                    "\nMissing {} candles in {} intervals:",
                    report.missing(),
                    report.intervals.len()
                );
                println!("{:<25} {:<25} {:>8}", "START", "END", "BARS");
                println!("{}", "-".repeat(60));
                for interval in &report.intervals {
                    println!(
                        "{:<25} {:<25} {:>8}",
                        format_ms(interval.start),
                        format_ms(interval.end),
                        interval.len(report.step_ms).unwrap_or_default()
                    );
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction() {
        assert_eq!(direction(&Ohlcv::new(0, 1.0, 2.0, 0.5, 1.5, 10.0)), "up");
        assert_eq!(direction(&Ohlcv::new(0, 1.5, 2.0, 0.5, 1.0, 10.0)), "down");
        assert_eq!(direction(&Ohlcv::new(0, 1.0, 1.0, 1.0, 1.0, 0.0)), "flat");
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("1704067200000").unwrap(), 1_704_067_200_000);
        assert_eq!(parse_time("2024-01-01").unwrap(), 1_704_067_200_000);
        assert_eq!(parse_time("2024-01-01T00:15:00Z").unwrap(), 1_704_068_100_000);
        assert!(parse_time("yesterday").is_err());
    }

    #[test]
    fn test_container_name() {
        assert_eq!(
            container_name("BTCUSDT", Interval::Minute15),
            "btcusdt_15m.parquet"
        );
    }
}
