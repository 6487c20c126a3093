//! Binance REST endpoint table and URL construction.

use std::fmt;

/// Base URL for Binance public market data.
pub const BASE_URL: &str = "https://data-api.binance.vision";

/// A public market-data endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Server time.
    Time,
    /// Candlestick bars.
    Klines,
    /// Current average price.
    AvgPrice,
    /// Order book.
    Depth,
    /// Exchange trading rules and symbol information.
    ExchangeInfo,
    /// Connectivity test.
    Ping,
    /// Rolling window price change statistics.
    Ticker,
    /// 24 hour price change statistics.
    Ticker24hr,
    /// Best bid and ask.
    BookTicker,
    /// Latest price.
    TickerPrice,
    /// Recent trades.
    Trades,
}

impl Endpoint {
    /// Returns the path relative to the base URL.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Time => "/api/v3/time",
            Self::Klines => "/api/v3/klines",
            Self::AvgPrice => "/api/v3/avgPrice",
            Self::Depth => "/api/v3/depth",
            Self::ExchangeInfo => "/api/v3/exchangeInfo",
            Self::Ping => "/api/v3/ping",
            Self::Ticker => "/api/v3/ticker",
            Self::Ticker24hr => "/api/v3/ticker/24hr",
            Self::BookTicker => "/api/v3/ticker/bookTicker",
            Self::TickerPrice => "/api/v3/ticker/price",
            Self::Trades => "/api/v3/trades",
        }
    }

    /// Returns all endpoints.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Time,
            Self::Klines,
            Self::AvgPrice,
            Self::Depth,
            Self::ExchangeInfo,
            Self::Ping,
            Self::Ticker,
            Self::Ticker24hr,
            Self::BookTicker,
            Self::TickerPrice,
            Self::Trades,
        ]
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Joins a base URL and an endpoint path.
///
/// A trailing slash on `base` is ignored.
///
/// # Example
///
/// ```
/// use klines_fetch::url::{Endpoint, endpoint_url};
///
/// let url = endpoint_url("https://data-api.binance.vision/", Endpoint::Klines);
/// assert_eq!(url, "https://data-api.binance.vision/api/v3/klines");
/// ```
#[must_use]
pub fn endpoint_url(base: &str, endpoint: Endpoint) -> String {
    format!("{}{}", base.trim_end_matches('/'), endpoint.path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url(BASE_URL, Endpoint::Time),
            "https://data-api.binance.vision/api/v3/time"
        );
        assert_eq!(
            endpoint_url("http://localhost:8080//", Endpoint::BookTicker),
            "http://localhost:8080/api/v3/ticker/bookTicker"
        );
    }

    #[test]
    fn test_paths_are_unique() {
        let all = Endpoint::all();
        assert_eq!(all.len(), 11);
        for (i, endpoint) in all.iter().enumerate() {
            assert!(endpoint.path().starts_with("/api/v3/"));
            assert!(all[..i].iter().all(|e| e.path() != endpoint.path()));
        }
    }
}
