//! CLI command implementations.

pub(crate) mod export;
pub(crate) mod fetch;
pub(crate) mod gaps;
pub(crate) mod intervals;
pub(crate) mod show;
pub(crate) mod time;
