//! Raw candle representation as delivered by the data source.

use serde::{Deserialize, Serialize};

/// A single scalar inside a raw candle.
///
/// Binance sends timestamps and trade counts as JSON numbers and prices and
/// volumes as decimal strings; both forms deserialize into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    /// Integral JSON number.
    Integer(i64),
    /// Fractional JSON number (or an integer outside the `i64` range).
    Float(f64),
    /// JSON string, usually a decimal number.
    Text(String),
}

impl RawField {
    /// Interprets the field as a floating-point number.
    ///
    /// Returns `None` for text that does not parse as a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Interprets the field as an integral millisecond timestamp.
    ///
    /// Accepts integers, floats without a fractional part and integer text.
    #[must_use]
    pub fn as_millis(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Float(v) => float_to_millis(*v),
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_millis))
            }
        }
    }
}

fn float_to_millis(v: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

impl std::fmt::Display for RawField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RawField {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for RawField {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawField {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One candle as a positional tuple of scalars.
///
/// The Binance layout has 12 fields: open time, open, high, low, close,
/// volume, close time, quote asset volume, number of trades, taker buy base
/// asset volume, taker buy quote asset volume and an unused trailing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCandle(Vec<RawField>);

impl RawCandle {
    /// Number of fields in a Binance kline.
    pub const BINANCE_WIDTH: usize = 12;

    /// Creates a raw candle from its fields.
    #[must_use]
    pub const fn new(fields: Vec<RawField>) -> Self {
        Self(fields)
    }

    /// Returns the fields in source order.
    #[must_use]
    pub fn fields(&self) -> &[RawField] {
        &self.0
    }

    /// Returns the field at `position`, if present.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&RawField> {
        self.0.get(position)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the candle has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<RawField>> for RawCandle {
    fn from(fields: Vec<RawField>) -> Self {
        Self(fields)
    }
}

/// A fetched batch of candles together with the status the source reported.
#[derive(Debug, Clone, PartialEq)]
pub struct KlineBatch {
    /// HTTP status code of the fetch.
    pub status: u16,
    /// Candles in source order. Empty when the fetch failed.
    pub candles: Vec<RawCandle>,
}

impl KlineBatch {
    /// Creates a batch from a successful fetch.
    #[must_use]
    pub const fn ok(candles: Vec<RawCandle>) -> Self {
        Self {
            status: 200,
            candles,
        }
    }

    /// Creates an empty batch for a fetch that returned `status`.
    #[must_use]
    pub const fn failed(status: u16) -> Self {
        Self {
            status,
            candles: Vec::new(),
        }
    }

    /// Returns true if the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_binance_row() {
        let json = r#"[1499040000000,"0.01634790","0.80000000","0.01575800","0.01577100",
            "148976.11427815",1499644799999,"2434.19055334",308,"1756.87402397",
            "28.46694368","0"]"#;
        let candle: RawCandle = serde_json::from_str(json).unwrap();

        assert_eq!(candle.len(), RawCandle::BINANCE_WIDTH);
        assert_eq!(candle.get(0), Some(&RawField::Integer(1_499_040_000_000)));
        assert_eq!(candle.get(1), Some(&RawField::Text("0.01634790".into())));
        assert_eq!(candle.get(8), Some(&RawField::Integer(308)));
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(RawField::from("0.5").as_f64(), Some(0.5));
        assert_eq!(RawField::from(" 42 ").as_f64(), Some(42.0));
        assert_eq!(RawField::from(7_i64).as_f64(), Some(7.0));
        assert_eq!(RawField::from("abc").as_f64(), None);
    }

    #[test]
    fn test_as_millis() {
        assert_eq!(RawField::from(1_000_i64).as_millis(), Some(1_000));
        assert_eq!(RawField::from(1_000.0).as_millis(), Some(1_000));
        assert_eq!(RawField::from("1000").as_millis(), Some(1_000));
        assert_eq!(RawField::from("1000.0").as_millis(), Some(1_000));
        assert_eq!(RawField::from(1_000.5).as_millis(), None);
        assert_eq!(RawField::from(f64::NAN).as_millis(), None);
        assert_eq!(RawField::from("soon").as_millis(), None);
    }

    #[test]
    fn test_batch_status() {
        assert!(KlineBatch::ok(vec![]).is_success());
        assert!(!KlineBatch::failed(429).is_success());
        assert!(!KlineBatch::failed(101).is_success());
    }
}
