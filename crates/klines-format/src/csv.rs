//! CSV output format.

use klines_types::CanonicalTable;
use klines_types::time::format_ms;
use std::io::Write;

use crate::{FormatError, Formatter};

/// CSV formatter.
///
/// The first field is the open time in RFC 3339, followed by the value
/// columns in table order.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_table<W: Write + Send>(
        &self,
        table: &CanonicalTable,
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            write!(writer, "{}", table.index_label())?;
            for name in table.column_names() {
                write!(writer, "{d}{name}")?;
            }
            writeln!(writer)?;
        }

        for row in table.rows() {
            write!(writer, "{}", format_ms(row.time()))?;
            for value in row.values() {
                write!(writer, "{d}{value}")?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use klines_types::Ohlcv;
    use std::io::Cursor;

    fn create_test_table() -> CanonicalTable {
        CanonicalTable::from_ohlcv(&[
            Ohlcv::new(1_705_321_800_000, 42_000.1, 42_100.0, 41_900.55, 42_050.0, 12.5),
            Ohlcv::new(1_705_322_700_000, 42_050.0, 42_060.0, 42_000.0, 42_010.25, 0.1 + 0.2),
        ])
        .unwrap()
    }

    #[test]
    fn test_csv_table() {
        let formatter = CsvFormatter::new();
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_table(&create_test_table(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines[0], "open time,Open,High,Low,Close,Volume");
        assert_eq!(lines[1], "2024-01-15T12:30:00.000Z,42000.1,42100,41900.55,42050,12.5");
        assert_eq!(
            lines[2],
            "2024-01-15T12:45:00.000Z,42050,42060,42000,42010.25,0.30000000000000004"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_no_header() {
        let formatter = CsvFormatter::new().with_header(false);
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_table(&create_test_table(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(!result.contains("open time"));
        assert_eq!(result.lines().count(), 2);
    }

    #[test]
    fn test_tsv() {
        let formatter = CsvFormatter::tsv();
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_table(&create_test_table(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.starts_with("open time\tOpen\tHigh"));
        assert_eq!(formatter.extension(), "tsv");
        assert_eq!(CsvFormatter::new().with_delimiter(';').extension(), "csv");
    }

    #[test]
    fn test_csv_empty_table() {
        let mut output = Cursor::new(Vec::new());
        CsvFormatter::new()
            .write_table(&create_test_table().slice(0..0), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(result, "open time,Open,High,Low,Close,Volume\n");
    }
}
