//! Binance market data client for the klines candle pipeline.
//!
//! - [`url::endpoint_url`] - Endpoint URL construction
//! - [`StatusClass`] - Response status classification
//! - [`KlinesClient`] - Single-request HTTP client
//! - [`parse_klines`] - Response body parsing

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/klines/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod parse;
mod status;
pub mod url;

pub use client::{ClientConfig, FetchError, KlinesClient, KlinesRequest};
pub use parse::{parse_klines, parse_server_time};
pub use status::StatusClass;
