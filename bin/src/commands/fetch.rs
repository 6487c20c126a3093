//! Fetch command implementation.
//!
//! Fetches one batch of klines, normalizes it, reports missing candles and
//! saves the table to a container.

use crate::display::{container_name, data_dir, parse_time};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use klines_lib::prelude::*;
use klines_lib::{check_completeness, time::format_ms};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Arguments of the fetch command.
pub(crate) struct FetchArgs {
    pub(crate) symbol: String,
    pub(crate) interval: Interval,
    pub(crate) limit: Option<u16>,
    pub(crate) start: Option<String>,
    pub(crate) end: Option<String>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) schema: Option<PathBuf>,
    pub(crate) base_url: Option<String>,
}

/// Fetch, check and store klines for a symbol.
pub(crate) async fn fetch(args: FetchArgs, quiet: bool) -> Result<()> {
    let normalizer = match &args.schema {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema {}", path.display()))?;
            let schema = KlineSchema::from_json_str(&json)
                .with_context(|| format!("Invalid schema {}", path.display()))?;
            Normalizer::new(schema)?
        }
        None => Normalizer::binance(),
    };

    let mut request = KlinesRequest::new(&args.symbol, args.interval);
    if let Some(start) = &args.start {
        request = request.with_start(parse_time(start)?);
    }
    if let Some(end) = &args.end {
        request = request.with_end(parse_time(end)?);
    }
    if let Some(limit) = args.limit {
        request = request.with_limit(limit);
    }

    let output = match args.output {
        Some(path) => path,
        None => {
            let dir = data_dir();
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            dir.join(container_name(&args.symbol, args.interval))
        }
    };

    let mut config = ClientConfig::default();
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    let client = KlinesClient::new(config)?;

    // Setup spinner
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching {} {}", request.symbol, request.interval));
        pb
    };

    let batch = client.klines(&request).await;
    progress.finish_and_clear();
    let batch = batch.with_context(|| format!("Failed to fetch {} klines", request.symbol))?;

    let table = normalizer
        .normalize_batch(&batch)
        .with_context(|| format!("Failed to normalize {} klines", request.symbol))?;
    info!(rows = table.len(), "normalized batch");

    let report = match args.interval.duration() {
        Some(frequency) => Some(check_completeness(&table, frequency)?),
        None => {
            warn!(interval = %args.interval, "interval has no fixed length, skipping gap check");
            None
        }
    };

    let store = TableStore::new(&output);
    store.save(&table)?;

    if !quiet {
        if let (Some(first), Some(last)) = (table.first_time(), table.last_time()) {
            println!(
                "Fetched {} bars: {} -> {}",
                table.len(),
                format_ms(first),
                format_ms(last)
            );
        }
        if let Some(report) = &report {
            if report.is_complete() {
                println!("No missing candles.");
            } else {
                println!(
                    "Missing {} candles in {} intervals:",
                    report.missing(),
                    report.intervals.len()
                );
                for gap in &report.intervals {
                    println!("  {gap}");
                }
            }
        }
        println!("Saved to: {}", store.path().display());
    }

    Ok(())
}
