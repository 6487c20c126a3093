//! JSON output format.

use klines_types::time::format_ms;
use klines_types::{CanonicalTable, Row};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
///
/// Each row becomes an object keyed by the table labels, in table order.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }
}

/// Serializes one row as a label-ordered map.
struct JsonRow<'a> {
    table: &'a CanonicalTable,
    row: Row<'a>,
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.columns().len() + 1))?;
        map.serialize_entry(self.table.index_label(), &format_ms(self.row.time()))?;
        for (name, value) in self.table.column_names().zip(self.row.values()) {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Serializes every row as a sequence.
struct JsonRows<'a>(&'a CanonicalTable);

impl Serialize for JsonRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let table = self.0;
        serializer.collect_seq(table.rows().map(|row| JsonRow { table, row }))
    }
}

impl Formatter for JsonFormatter {
    fn write_table<W: Write + Send>(
        &self,
        table: &CanonicalTable,
        mut writer: W,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, &JsonRows(table))?;
                } else {
                    serde_json::to_writer(&mut writer, &JsonRows(table))?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for row in table.rows() {
                    serde_json::to_writer(&mut writer, &JsonRow { table, row })?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use klines_types::Ohlcv;
    use std::io::Cursor;

    fn create_test_table() -> CanonicalTable {
        CanonicalTable::from_ohlcv(&[
            Ohlcv::new(1_705_321_800_000, 1.1001, 1.2, 1.0, 1.1, 100.0),
            Ohlcv::new(1_705_322_700_000, 1.1, 1.15, 1.05, 1.12, 200.5),
        ])
        .unwrap()
    }

    #[test]
    fn test_json_array() {
        let formatter = JsonFormatter::new();
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_table(&create_test_table(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.starts_with(
            r#"[{"open time":"2024-01-15T12:30:00.000Z","Open":1.1001,"High":1.2,"#
        ));

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["Volume"], 200.5);
    }

    #[test]
    fn test_ndjson() {
        let formatter = JsonFormatter::ndjson();
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_table(&create_test_table(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let row: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(row.get("open time").is_some());
        }
        assert_eq!(formatter.extension(), "ndjson");
    }

    #[test]
    fn test_json_pretty() {
        let formatter = JsonFormatter::new().with_pretty(true);
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_table(&create_test_table(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains("\n  {"));
    }

    #[test]
    fn test_json_empty_table() {
        let mut output = Cursor::new(Vec::new());
        JsonFormatter::new()
            .write_table(&create_test_table().slice(0..0), &mut output)
            .unwrap();

        assert_eq!(String::from_utf8(output.into_inner()).unwrap(), "[]\n");
    }
}
