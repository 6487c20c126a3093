//! Candle ingestion, gap detection and persistence for Binance klines.
//!
//! This is a facade crate that re-exports functionality from the klines
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use klines_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KlinesClient::with_defaults()?;
//!     let batch = client
//!         .klines(&KlinesRequest::new("BTCUSDT", Interval::Minute15))
//!         .await?;
//!
//!     let table = normalize_batch(&batch)?;
//!     for gap in find_gaps_for(&table, Interval::Minute15)? {
//!         println!("missing {gap}");
//!     }
//!     save(&table, "btcusdt_15m")?;
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/klines/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use klines_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use klines_fetch::{
    ClientConfig, FetchError, KlinesClient, KlinesRequest, StatusClass, parse_klines, url,
};

// Re-export normalization
#[cfg(feature = "normalize")]
pub use klines_normalize::{Normalizer, normalize, normalize_batch};

// Re-export completeness checking
#[cfg(feature = "gaps")]
pub use klines_gaps::{
    CompletenessReport, MissingTimestamps, check_completeness, check_completeness_for,
    find_gaps, find_gaps_for, group_runs, missing_timestamps,
};

// Re-export persistence
#[cfg(feature = "store")]
pub use klines_store::{Compression, StoreError, TableStore, container_path, load, save};

// Re-export formatters
#[cfg(feature = "format")]
pub use klines_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
};

/// Prelude module for convenient imports.
///
/// ```
/// use klines_lib::prelude::*;
/// ```
pub mod prelude {
    pub use klines_types::{
        CanonicalTable, Interval, KlineBatch, KlineSchema, KlinesError, MissingInterval, Ohlcv,
        RawCandle, Result,
    };

    #[cfg(feature = "fetch")]
    pub use klines_fetch::{ClientConfig, KlinesClient, KlinesRequest};

    #[cfg(feature = "normalize")]
    pub use klines_normalize::{Normalizer, normalize, normalize_batch};

    #[cfg(feature = "gaps")]
    pub use klines_gaps::{check_completeness_for, find_gaps, find_gaps_for};

    #[cfg(feature = "store")]
    pub use klines_store::{TableStore, load, save};

    #[cfg(feature = "format")]
    pub use klines_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};
}
