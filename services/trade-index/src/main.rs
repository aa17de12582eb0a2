//! Trade Index command line
//!
//! Loads a JSON file of transaction records into a fresh platform and runs
//! a single query against it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use services_common::{PlatformConfig, init_tracing};
use std::path::PathBuf;
use trade_index::{Trade, TradingPlatform, ingest, load_transactions};
use tracing::{info, warn};

/// Per-instrument trade value index
#[derive(Parser)]
#[clap(name = "trade-index")]
#[clap(about = "Query executed trades by trade value")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Configuration file
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[clap(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// All trades for an instrument, ascending by value
    Sorted {
        /// Instrument name
        stock: String,
        /// JSON file of transaction records
        #[clap(long)]
        input: PathBuf,
    },
    /// Trades at the smallest value
    Min {
        /// Instrument name
        stock: String,
        /// JSON file of transaction records
        #[clap(long)]
        input: PathBuf,
    },
    /// Trades at the largest value
    Max {
        /// Instrument name
        stock: String,
        /// JSON file of transaction records
        #[clap(long)]
        input: PathBuf,
    },
    /// Trades at the greatest value not above a threshold
    Floor {
        /// Instrument name
        stock: String,
        /// Threshold value
        threshold: f64,
        /// JSON file of transaction records
        #[clap(long)]
        input: PathBuf,
    },
    /// Trades at the least value not below a threshold
    Ceiling {
        /// Instrument name
        stock: String,
        /// Threshold value
        threshold: f64,
        /// JSON file of transaction records
        #[clap(long)]
        input: PathBuf,
    },
    /// Trades with value inside an inclusive window
    Range {
        /// Instrument name
        stock: String,
        /// Lower bound
        from: f64,
        /// Upper bound
        to: f64,
        /// JSON file of transaction records
        #[clap(long)]
        input: PathBuf,
    },
    /// Trade and level counts per instrument
    Summary {
        /// JSON file of transaction records
        #[clap(long)]
        input: PathBuf,
    },
}

impl Commands {
    fn input(&self) -> &PathBuf {
        match self {
            Self::Sorted { input, .. }
            | Self::Min { input, .. }
            | Self::Max { input, .. }
            | Self::Floor { input, .. }
            | Self::Ceiling { input, .. }
            | Self::Range { input, .. }
            | Self::Summary { input } => input,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> PlatformConfig {
    let Some(path) = path else {
        return PlatformConfig::default();
    };
    match PlatformConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet
            eprintln!("{e:#}; using default configuration");
            PlatformConfig::default()
        }
    }
}

fn print_trades<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Result<()> {
    let trades: Vec<&Trade> = trades.into_iter().collect();
    println!("{}", serde_json::to_string_pretty(&trades)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref());
    if cli.debug {
        config.logging.level = "debug".to_string();
    }
    init_tracing(&config.logging);

    info!(instruments = config.instruments.len(), "starting trade index");

    let mut platform = TradingPlatform::from_config(&config);
    let records = load_transactions(cli.command.input())?;
    let summary = ingest(&mut platform, records);
    if summary.rejected > 0 {
        warn!(rejected = summary.rejected, "some transactions were rejected");
    }

    match &cli.command {
        Commands::Sorted { stock, .. } => print_trades(platform.sorted_transactions(stock)?)?,
        Commands::Min { stock, .. } => print_trades(platform.min_transactions(stock)?)?,
        Commands::Max { stock, .. } => print_trades(platform.max_transactions(stock)?)?,
        Commands::Floor {
            stock, threshold, ..
        } => print_trades(platform.floor_transactions(stock, *threshold)?)?,
        Commands::Ceiling {
            stock, threshold, ..
        } => print_trades(platform.ceiling_transactions(stock, *threshold)?)?,
        Commands::Range {
            stock, from, to, ..
        } => print_trades(platform.range_transactions(stock, *from, *to)?)?,
        Commands::Summary { .. } => {
            for name in platform.instruments() {
                if let Some(index) = platform.index(name) {
                    println!(
                        "{name}: {} trades, {} levels, height {}",
                        index.len(),
                        index.level_count(),
                        index.height()
                    );
                }
            }
        }
    }

    Ok(())
}
