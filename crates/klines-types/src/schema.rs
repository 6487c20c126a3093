//! Column layout of raw candles.

use serde::{Deserialize, Serialize};

use crate::SchemaError;

/// Labels of the 12 positional fields of a Binance kline.
pub const BINANCE_LABELS: [&str; 12] = [
    "open time",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Close time",
    "Quote asset volume",
    "Number of trades",
    "Taker buy base asset volume",
    "Taker buy quote asset volume",
    "unused",
];

/// Label of the Binance open-time field, promoted to the table index.
pub const OPEN_TIME: &str = "open time";

/// The OHLCV columns kept by default, in output order.
pub const OHLCV_COLUMNS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

/// Positional layout of raw candles and the subset of fields to keep.
///
/// Every raw candle must have exactly `labels.len()` fields. The field
/// labelled `index` becomes the table index; the `retained` fields become
/// the table columns, in the order listed here. All other fields are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KlineSchema {
    /// Labels of the raw fields, in source order.
    pub labels: Vec<String>,
    /// Label of the field promoted to the index.
    pub index: String,
    /// Labels of the fields kept as columns, in output order.
    pub retained: Vec<String>,
}

impl Default for KlineSchema {
    fn default() -> Self {
        Self::binance()
    }
}

impl KlineSchema {
    /// Returns the Binance kline layout, keeping only OHLCV columns.
    #[must_use]
    pub fn binance() -> Self {
        Self {
            labels: BINANCE_LABELS.iter().map(|s| (*s).to_string()).collect(),
            index: OPEN_TIME.to_string(),
            retained: OHLCV_COLUMNS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Parses a schema from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the schema is inconsistent.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let schema: Self = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Returns the number of fields each raw candle must have.
    #[must_use]
    pub fn width(&self) -> usize {
        self.labels.len()
    }

    /// Returns the source position of the index field.
    #[must_use]
    pub fn index_position(&self) -> Option<usize> {
        self.position(&self.index)
    }

    /// Returns the source position of each retained field, in output order.
    #[must_use]
    pub fn retained_positions(&self) -> Option<Vec<usize>> {
        self.retained.iter().map(|label| self.position(label)).collect()
    }

    /// Returns the labels that are dropped during normalization.
    pub fn dropped(&self) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .filter(|l| **l != self.index && !self.retained.contains(l))
            .map(String::as_str)
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Checks that the schema is self-consistent.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] if labels repeat, the index or a
    /// retained label is missing from `labels`, the index is also retained, or
    /// nothing is retained.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let invalid = |msg: String| -> Result<(), SchemaError> {
            Err(SchemaError::InvalidSchema(msg))
        };

        for (i, label) in self.labels.iter().enumerate() {
            if self.labels[..i].contains(label) {
                return invalid(format!("duplicate label '{label}'"));
            }
        }
        if self.index_position().is_none() {
            return invalid(format!("index '{}' is not a label", self.index));
        }
        if self.retained.is_empty() {
            return invalid("no columns retained".to_string());
        }
        for (i, label) in self.retained.iter().enumerate() {
            if *label == self.index {
                return invalid(format!("index '{label}' cannot also be retained"));
            }
            if self.position(label).is_none() {
                return invalid(format!("retained column '{label}' is not a label"));
            }
            if self.retained[..i].contains(label) {
                return invalid(format!("column '{label}' retained twice"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binance_schema() {
        let schema = KlineSchema::binance();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.width(), 12);
        assert_eq!(schema.index_position(), Some(0));
        assert_eq!(schema.retained_positions(), Some(vec![1, 2, 3, 4, 5]));

        let dropped: Vec<_> = schema.dropped().collect();
        assert_eq!(
            dropped,
            vec![
                "Close time",
                "Quote asset volume",
                "Number of trades",
                "Taker buy base asset volume",
                "Taker buy quote asset volume",
                "unused",
            ]
        );
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "labels": ["t", "price", "qty"],
            "index": "t",
            "retained": ["price"]
        }"#;
        let schema = KlineSchema::from_json_str(json).unwrap();
        assert_eq!(schema.width(), 3);
        assert_eq!(schema.retained_positions(), Some(vec![1]));
    }

    #[test]
    fn test_invalid_schemas() {
        let mut schema = KlineSchema::binance();
        schema.index = "missing".into();
        assert!(schema.validate().is_err());

        let mut schema = KlineSchema::binance();
        schema.retained.push("open time".into());
        assert!(schema.validate().is_err());

        let mut schema = KlineSchema::binance();
        schema.retained.clear();
        assert!(schema.validate().is_err());

        let mut schema = KlineSchema::binance();
        schema.retained.push("Open".into());
        assert!(schema.validate().is_err());

        let mut schema = KlineSchema::binance();
        schema.labels[11] = "Open".into();
        assert!(schema.validate().is_err());
    }
}
