//! Candle normalization for the klines pipeline.
//!
//! This crate turns positional raw candles into a [`CanonicalTable`]:
//!
//! - [`Normalizer`] - Schema-driven normalizer, reusable across batches
//! - [`normalize`] - Normalizes Binance klines to an OHLCV table
//! - [`normalize_batch`] - Same, refusing batches from failed fetches
//!
//! [`CanonicalTable`]: klines_types::CanonicalTable

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/klines/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod normalizer;

pub use normalizer::{Normalizer, normalize, normalize_batch};
