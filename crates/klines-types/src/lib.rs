//! Core types for the klines candle pipeline.
//!
//! This crate provides the data structures shared by every stage:
//!
//! - [`RawCandle`] - A positional candle tuple as delivered by the data source
//! - [`KlineBatch`] - Fetched candles together with the source's status code
//! - [`KlineSchema`] - Field labels and the subset of fields to keep
//! - [`CanonicalTable`] - Normalized, time-indexed, all-`f64` candle table
//! - [`MissingInterval`] - A run of absent timestamps
//! - [`Interval`] - Kline sampling interval

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/klines/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod candle;
mod error;
mod gap;
mod interval;
mod ohlcv;
mod schema;
mod table;
pub mod time;

pub use candle::{KlineBatch, RawCandle, RawField};
pub use error::{ConversionError, GapError, KlinesError, Result, SchemaError};
pub use gap::MissingInterval;
pub use interval::{Interval, IntervalParseError};
pub use ohlcv::Ohlcv;
pub use schema::{BINANCE_LABELS, KlineSchema, OHLCV_COLUMNS, OPEN_TIME};
pub use table::{CanonicalTable, Column, Row};
