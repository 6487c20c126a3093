//! Error types for klines.

use thiserror::Error;

/// Result type alias for klines operations.
pub type Result<T> = std::result::Result<T, KlinesError>;

/// Errors that can occur while turning fetched candles into a table.
#[derive(Error, Debug)]
pub enum KlinesError {
    /// Raw input does not have the expected shape.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A field could not be converted to a number.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Gap detection failed.
    #[error(transparent)]
    Gap(#[from] GapError),

    /// The upstream fetch reported a non-success status.
    #[error("Fetch failed with status {status}")]
    FetchFailed {
        /// HTTP status code reported by the data source.
        status: u16,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Malformed raw input or table shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No candles were supplied.
    #[error("No candles to normalize")]
    Empty,

    /// A candle has the wrong number of positional fields.
    #[error("Row {row} has {found} fields, expected {expected}")]
    FieldCount {
        /// Zero-based row number in the raw input.
        row: usize,
        /// Number of labels in the schema.
        expected: usize,
        /// Number of fields in the row.
        found: usize,
    },

    /// Two rows share the same open time.
    #[error("Duplicate open time {time}")]
    DuplicateIndex {
        /// The repeated index value.
        time: i64,
    },

    /// The index is not sorted ascending.
    #[error("Index is not strictly increasing at position {position}")]
    UnsortedIndex {
        /// Position of the first out-of-order value.
        position: usize,
    },

    /// A column length differs from the index length.
    #[error("Column '{column}' has {found} values, index has {expected}")]
    ColumnLength {
        /// Column label.
        column: String,
        /// Index length.
        expected: usize,
        /// Column length.
        found: usize,
    },

    /// A column holds a NaN or infinite value.
    #[error("Column '{column}' has a non-finite value at row {row}")]
    NonFinite {
        /// Column label.
        column: String,
        /// Zero-based row.
        row: usize,
    },

    /// The schema definition itself is inconsistent.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

/// A raw field that could not be converted to a number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot convert '{value}' in row {row}, column '{column}' to a number")]
pub struct ConversionError {
    /// Zero-based row number in the raw input.
    pub row: usize,
    /// Label of the offending column.
    pub column: String,
    /// The offending value, rendered as text.
    pub value: String,
}

/// Errors raised by the completeness checker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GapError {
    /// Sampling frequency is zero, negative or finer than one millisecond.
    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    /// An index value is not on the grid spanned from the first timestamp.
    #[error("Timestamp {time} is not aligned to a {step} ms grid starting at {origin}")]
    MisalignedIndex {
        /// The offending index value.
        time: i64,
        /// Grid origin (smallest index value).
        origin: i64,
        /// Grid step in milliseconds.
        step: i64,
    },
}
