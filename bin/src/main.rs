//! klines CLI - Fetch, check and store Binance candlestick data.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use klines_lib::Interval;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::{ExportFormat, ReportFormat};

#[derive(Parser)]
#[command(name = "klines")]
#[command(about = "Fetch, check and store Binance candlestick data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch klines, report gaps and save them to a container
    Fetch {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,

        /// Bar interval (1s, 1m, 3m, 5m, 15m, 30m, 1h, ..., 1w, 1M)
        #[arg(short, long, default_value = "15m")]
        interval: Interval,

        /// Maximum number of bars (Binance caps this at 1000)
        #[arg(short, long)]
        limit: Option<u16>,

        /// Earliest open time (milliseconds, YYYY-MM-DD or RFC 3339)
        #[arg(short, long)]
        start: Option<String>,

        /// Latest open time (milliseconds, YYYY-MM-DD or RFC 3339)
        #[arg(short, long)]
        end: Option<String>,

        /// Container path. Defaults to <data dir>/<symbol>_<interval>.parquet
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file describing the row layout and retained columns
        #[arg(long)]
        schema: Option<PathBuf>,

        /// REST API base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Report missing candles in a stored table
    Gaps {
        /// Container path
        path: PathBuf,

        /// Expected bar interval
        #[arg(short, long, default_value = "15m")]
        interval: Interval,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Export a stored table to CSV or JSON
    Export {
        /// Container path
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file. Defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the last bars of a stored table
    Show {
        /// Container path
        path: PathBuf,

        /// Number of bars
        #[arg(short = 'n', long, default_value = "10")]
        rows: usize,
    },

    /// List supported intervals
    Intervals,

    /// Print the exchange server time
    Time {
        /// REST API base URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Fetch {
            symbol,
            interval,
            limit,
            start,
            end,
            output,
            schema,
            base_url,
        } => {
            let args = commands::fetch::FetchArgs {
                symbol,
                interval,
                limit,
                start,
                end,
                output,
                schema,
                base_url,
            };
            commands::fetch::fetch(args, cli.quiet).await
        }
        Commands::Gaps {
            path,
            interval,
            format,
        } => commands::gaps::gaps(&path, interval, format),
        Commands::Export {
            path,
            format,
            output,
        } => commands::export::export(&path, format, output.as_deref(), cli.quiet),
        Commands::Show { path, rows } => commands::show::show(&path, rows),
        Commands::Intervals => {
            commands::intervals::list_intervals();
            Ok(())
        }
        Commands::Time { base_url } => commands::time::server_time(base_url).await,
    }
}
