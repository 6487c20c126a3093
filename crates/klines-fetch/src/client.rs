//! HTTP client for Binance market data.

use klines_types::{Interval, KlineBatch};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::parse::{parse_klines, parse_server_time};
use crate::status::StatusClass;
use crate::url::{BASE_URL, Endpoint, endpoint_url};

/// Configuration for the klines client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Row limit used when a request does not set one.
    pub limit: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("klines/{}", env!("CARGO_PKG_VERSION")),
            limit: 500,
        }
    }
}

impl ClientConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the default row limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: u16) -> Self {
        self.limit = limit;
        self
    }
}

/// Errors that can occur while fetching.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status.
    #[error("Server returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Response body could not be decoded.
    #[error("Invalid response body: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parameters of a klines request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlinesRequest {
    /// Trading pair, for example `BTCUSDT`.
    pub symbol: String,
    /// Bar interval.
    pub interval: Interval,
    /// Earliest open time in milliseconds.
    pub start_time: Option<i64>,
    /// Latest open time in milliseconds.
    pub end_time: Option<i64>,
    /// Maximum number of rows.
    pub limit: Option<u16>,
}

impl KlinesRequest {
    /// Creates a request for the most recent bars.
    #[must_use]
    pub fn new(symbol: impl Into<String>, interval: Interval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            start_time: None,
            end_time: None,
            limit: None,
        }
    }

    /// Sets the start time.
    #[must_use]
    pub const fn with_start(mut self, start_time: i64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Sets the end time.
    #[must_use]
    pub const fn with_end(mut self, end_time: i64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Sets the row limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: u16) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the query parameters, falling back to `default_limit`.
    ///
    /// Binance expects upper-case symbols.
    #[must_use]
    pub fn query(&self, default_limit: u16) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("symbol", self.symbol.to_uppercase()),
            ("interval", self.interval.as_str().to_string()),
        ];
        if let Some(start) = self.start_time {
            query.push(("startTime", start.to_string()));
        }
        if let Some(end) = self.end_time {
            query.push(("endTime", end.to_string()));
        }
        query.push(("limit", self.limit.unwrap_or(default_limit).to_string()));
        query
    }
}

/// Thin client over the public market-data endpoints.
///
/// Every call is a single request. Nothing is retried.
#[derive(Debug, Clone)]
pub struct KlinesClient {
    client: Client,
    config: ClientConfig,
}

impl KlinesClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches one batch of klines.
    ///
    /// A non-success status is not an error here: the batch carries the
    /// status and no candles, and normalizing it fails with `FetchFailed`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the request cannot be completed and
    /// [`FetchError::Parse`] if a successful response has a malformed body.
    pub async fn klines(&self, request: &KlinesRequest) -> Result<KlineBatch, FetchError> {
        let url = endpoint_url(&self.config.base_url, Endpoint::Klines);
        let response = self
            .client
            .get(&url)
            .query(&request.query(self.config.limit))
            .send()
            .await?;

        let status = response.status().as_u16();
        let class = StatusClass::classify(status);
        if !class.is_ok() {
            log_failure(Endpoint::Klines, class);
            return Ok(KlineBatch::failed(status));
        }

        let body = response.bytes().await?;
        let candles = parse_klines(&body)?;
        debug!(
            symbol = %request.symbol,
            interval = %request.interval,
            rows = candles.len(),
            "fetched klines"
        );
        Ok(KlineBatch {
            status,
            candles,
        })
    }

    /// Fetches the server time in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for a non-success status, plus the
    /// errors of [`KlinesClient::klines`].
    pub async fn server_time(&self) -> Result<i64, FetchError> {
        let url = endpoint_url(&self.config.base_url, Endpoint::Time);
        let response = self.client.get(&url).send().await?;

        let status = response.status().as_u16();
        let class = StatusClass::classify(status);
        if !class.is_ok() {
            log_failure(Endpoint::Time, class);
            return Err(FetchError::Status { status });
        }

        parse_server_time(&response.bytes().await?)
    }
}

fn log_failure(endpoint: Endpoint, class: StatusClass) {
    match class {
        StatusClass::Ok => {}
        StatusClass::NotFound => warn!(%endpoint, "resource not found"),
        StatusClass::Rejected => warn!(%endpoint, "request rejected, rate limited or banned"),
        StatusClass::Unexpected(status) => warn!(%endpoint, status, "unexpected status"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://data-api.binance.vision");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.limit, 500);
        assert!(config.user_agent.starts_with("klines/"));
    }

    #[test]
    fn test_client_config_builders() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(1))
            .with_limit(1000);
        assert_eq!(config.base_url, "http://127.0.0.1:9");
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.limit, 1000);
    }

    #[test]
    fn test_request_query() {
        let request = KlinesRequest::new("btcusdt", Interval::Minute15);
        assert_eq!(
            request.query(500),
            vec![
                ("symbol", "BTCUSDT".to_string()),
                ("interval", "15m".to_string()),
                ("limit", "500".to_string()),
            ]
        );

        let request = request
            .with_start(1_704_067_200_000)
            .with_end(1_704_153_600_000)
            .with_limit(96);
        assert_eq!(
            request.query(500),
            vec![
                ("symbol", "BTCUSDT".to_string()),
                ("interval", "15m".to_string()),
                ("startTime", "1704067200000".to_string()),
                ("endTime", "1704153600000".to_string()),
                ("limit", "96".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = KlinesClient::with_defaults();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        // port 9 (discard) on loopback refuses connections
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let client = KlinesClient::new(config).unwrap();

        let result = client
            .klines(&KlinesRequest::new("BTCUSDT", Interval::Minute1))
            .await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }
}
