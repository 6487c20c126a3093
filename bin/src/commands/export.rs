//! Export command implementation.
//!
//! Writes a stored table as CSV, TSV, JSON or NDJSON, to a file or stdout.

use crate::display::ExportFormat;
use anyhow::{Context, Result};
use klines_lib::OutputFormat;
use klines_lib::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export a stored table.
pub(crate) fn export(
    path: &Path,
    format: ExportFormat,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let table = load(path)?;
    let format = OutputFormat::from(format);

    match output {
        Some(output) => {
            let file = File::create(output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            write_export(&table, format, file)?;
            if !quiet {
                eprintln!("Output written to: {}", output.display());
            }
        }
        None => write_export(&table, format, std::io::stdout())?,
    }

    Ok(())
}

/// Writes `table` through a buffered writer and flushes it.
fn write_export<W: Write + Send>(
    table: &CanonicalTable,
    format: OutputFormat,
    sink: W,
) -> Result<()> {
    let mut writer = BufWriter::new(sink);
    format.write_table(table, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CanonicalTable {
        CanonicalTable::from_ohlcv(&[
            Ohlcv::new(1_705_321_800_000, 42_000.1, 42_100.0, 41_900.55, 42_050.0, 12.5),
            Ohlcv::new(1_705_322_700_000, 42_050.0, 42_060.0, 42_000.0, 42_010.25, 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_export_csv_to_memory() {
        let mut buffer = Vec::new();
        write_export(&table(), ExportFormat::Csv.into(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "open time,Open,High,Low,Close,Volume");
        assert_eq!(lines[1], "2024-01-15T12:30:00.000Z,42000.1,42100,41900.55,42050,12.5");
    }

    #[test]
    fn test_export_ndjson_to_memory() {
        let mut buffer = Vec::new();
        write_export(&table(), ExportFormat::Ndjson.into(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let rows: Vec<serde_json::Value> =
            text.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["open time"], "2024-01-15T12:45:00.000Z");
        assert_eq!(rows[1]["Close"], 42_010.25);
    }
}
