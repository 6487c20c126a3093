//! Persistence for the klines candle pipeline.
//!
//! - [`TableStore`] - A canonical table bound to a container path
//! - [`save`] / [`load`] - One-shot helpers
//! - [`container_path`] - Derives the container file name

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/klines/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod store;

pub use error::{Result, StoreError};
pub use parquet::basic::Compression;
pub use store::{EXTENSION, LABELS_KEY, TableStore, container_path, load, save};
