//! Kline response parsing.

use klines_types::RawCandle;
use serde::Deserialize;

use crate::FetchError;

/// Parses a klines response body into raw candles.
///
/// The body is a JSON array of arrays. Rows are returned as delivered;
/// width and type checks belong to the normalizer.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] if the body is not a JSON array of arrays.
pub fn parse_klines(body: &[u8]) -> Result<Vec<RawCandle>, FetchError> {
    Ok(serde_json::from_slice(body)?)
}

#[derive(Debug, Deserialize)]
struct ServerTime {
    #[serde(rename = "serverTime")]
    server_time: i64,
}

/// Parses a `/api/v3/time` response body.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] if `serverTime` is missing.
pub fn parse_server_time(body: &[u8]) -> Result<i64, FetchError> {
    let time: ServerTime = serde_json::from_slice(body)?;
    Ok(time.server_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use klines_types::RawField;

    const BODY: &str = r#"[
        [1499040000000, "0.01634790", "0.80000000", "0.01575800", "0.01577100",
         "148976.11427815", 1499644799999, "2434.19055334", 308,
         "1756.87402397", "28.46694368", "0"],
        [1499040900000, "0.01577100", "0.01600000", "0.01570000", "0.01590000",
         "1000.5", 1499041799999, "16.0", 12, "500.25", "8.0", "0"]
    ]"#;

    #[test]
    fn test_parse_klines() {
        let candles = parse_klines(BODY.as_bytes()).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].len(), RawCandle::BINANCE_WIDTH);
        assert_eq!(candles[0].get(0), Some(&RawField::Integer(1_499_040_000_000)));
        assert_eq!(candles[0].get(1), Some(&RawField::Text("0.01634790".into())));
        assert_eq!(candles[1].get(8), Some(&RawField::Integer(12)));
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_klines(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_object() {
        let body = br#"{"code":-1121,"msg":"Invalid symbol."}"#;
        assert!(matches!(parse_klines(body), Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_parse_server_time() {
        assert_eq!(
            parse_server_time(br#"{"serverTime":1499827319559}"#).unwrap(),
            1_499_827_319_559
        );
        assert!(parse_server_time(b"{}").is_err());
    }
}
