//! Command-line arguments for the market ticker.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use broker_common::market_hours::HoursPolicy;
use clap::Parser;

use crate::config::{DEFAULT_INTERVAL_MS, DEFAULT_STATUS_POLL_SECS};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Milliseconds between price refreshes.
    #[clap(long, default_value_t = DEFAULT_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Number of points kept per symbol for sparklines.
    #[clap(long, default_value_t = broker_common::history::HISTORY_CAPACITY)]
    pub history_length: usize,

    /// Optional instruments file (`SYMBOL,baseline[,segment]` per line).
    /// The built-in watchlist is used when omitted.
    #[clap(long)]
    pub path: Option<String>,

    /// Trading window used for the Open/Closed label.
    #[clap(long, value_enum, default_value_t = HoursPolicy::Local)]
    pub market_hours: HoursPolicy,

    /// Seconds between market status checks.
    #[clap(long, default_value_t = DEFAULT_STATUS_POLL_SECS)]
    pub status_poll_secs: u64,

    /// Stop after this many ticks instead of running until Ctrl+C.
    #[clap(long)]
    pub ticks: Option<u64>,

    /// Directory to write one `<symbol>.svg` sparkline per instrument on every tick.
    #[clap(long)]
    pub svg_dir: Option<String>,
}
