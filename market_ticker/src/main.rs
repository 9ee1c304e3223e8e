//! Mock market ticker.
//!
//! This binary simulates a live ticker bar for a fixed watchlist. Nothing here talks to
//! an exchange: prices are a bounded random walk refreshed on a timer. Internally it
//! wires together:
//!
//! - `TickerStore`: current quotes and per-symbol price histories.
//! - `RefreshDriver`: perturbs every quote on each tick and broadcasts a
//!   `TickerEvent::Tick` snapshot to subscribers via `crossbeam_channel` senders.
//! - A market status poll: a `PeriodicTask` that re-evaluates the Open/Closed gate and
//!   reports transitions.
//! - The render layer: turns each snapshot into a text ticker bar and, optionally, one
//!   SVG sparkline per instrument.
//!
//! Concurrency and shutdown:
//! - Crossbeam `select!` multiplexes ticks, status changes and the Ctrl+C signal.
//! - Every timer is owned by a handle; leaving `main` drops the handles, which cancels the
//!   timers and joins their threads.
//!
//! Usage example (CLI):
//! ```bash
//! market_ticker --interval-ms 1500 --market-hours exchange --ticks 10 --svg-dir ./spark
//! ```
#![warn(missing_docs)]
use crate::args::Args;
use crate::config::TickerConfig;
use crate::model::periodic::PeriodicTask;
use crate::model::refresh_driver::{RefreshDriver, TickerEvent};
use crate::model::ticker_store::TickerStore;
use crate::render::{
    HERO_HEIGHT, HERO_WIDTH, SPARK_HEIGHT, SPARK_WIDTH, file_stem, hero_chart_svg, hero_values,
    sparkline_svg, ticker_bar,
};
use broker_common::BrokerError;
use broker_common::Result;
use broker_common::instruments::{Instrument, InstrumentParser, default_watchlist};
use broker_common::market_hours::{MarketHours, MarketStatus};
use broker_common::paths::{is_file_exist, normalize_path};
use clap::Parser;
use crossbeam_channel::{select, unbounded};
use log::{debug, error, info};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

mod args;
mod config;
pub mod model;
mod render;

/// Number of points in the decorative hero chart.
const HERO_POINTS: usize = 28;

fn main() -> Result<(), BrokerError> {
    init_logger();
    let args = Args::parse();
    let config = build_config(&args)?;
    config.validate()?;
    info!(
        "Watchlist: {:?}",
        config.instruments.iter().map(|i| &i.symbol).collect::<Vec<_>>()
    );

    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down ticker...");
        let _ = shutdown_tx.send(());
    })
    .map_err(|e| BrokerError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    let svg_dir = match args.svg_dir.as_deref() {
        Some(raw) => {
            let dir = normalize_path(raw);
            fs::create_dir_all(&dir)?;
            write_hero_chart(&dir)?;
            Some(dir)
        }
        None => None,
    };

    let store = Arc::new(Mutex::new(TickerStore::new(
        &config.instruments,
        config.history_length,
    )?));

    let mut status = config.market_hours.current_status();
    info!("Market {}", status);
    let (status_tx, status_rx) = unbounded::<MarketStatus>();
    let _status_poll = start_status_poll(config.market_hours, status, config.status_poll, status_tx)?;

    let driver = RefreshDriver::start(Arc::clone(&store), config.interval)?;
    let events = driver.subscribe()?;
    let mut ticks: u64 = 0;

    loop {
        select! {
            recv(events) -> msg => match msg {
                Ok(TickerEvent::Tick(quotes)) => {
                    ticks += 1;
                    info!("Tick {}\n{}", ticks, ticker_bar(&quotes, status));
                    if let Some(dir) = &svg_dir {
                        write_sparklines(dir, &store)?;
                    }
                    if args.ticks.is_some_and(|limit| ticks >= limit) {
                        info!("Reached {} ticks, stopping", ticks);
                        break;
                    }
                }
                Ok(TickerEvent::Shutdown) => break,
                Err(e) => {
                    error!("Ticker event channel closed: {}", e);
                    return Err(BrokerError::ChannelRecv(e.to_string()));
                }
            },
            recv(status_rx) -> msg => if let Ok(new_status) = msg {
                info!("Market status changed: {} -> {}", status, new_status);
                status = new_status;
            },
            recv(shutdown_rx) -> _ => break,
        }
    }

    driver.stop();
    Ok(())
}

fn build_config(args: &Args) -> Result<TickerConfig, BrokerError> {
    let instruments = match args.path.as_deref() {
        Some(raw) => load_instruments(&normalize_path(raw))?,
        None => default_watchlist(),
    };
    Ok(TickerConfig {
        instruments,
        interval: Duration::from_millis(args.interval_ms),
        history_length: args.history_length,
        market_hours: MarketHours::from(args.market_hours),
        status_poll: Duration::from_secs(args.status_poll_secs),
    })
}

fn load_instruments(path: &Path) -> Result<Vec<Instrument>, BrokerError> {
    if !is_file_exist(path) {
        return Err(BrokerError::Format(format!(
            "Instruments file not found: {}",
            path.display()
        )));
    }
    let file = File::open(path)?;
    Instrument::parse_from_file(BufReader::new(file))
}

/// Re-evaluate the market gate every `period` and send the new status on change.
fn start_status_poll(
    hours: MarketHours,
    initial: MarketStatus,
    period: Duration,
    status_tx: crossbeam_channel::Sender<MarketStatus>,
) -> Result<PeriodicTask, BrokerError> {
    let mut last = initial;
    PeriodicTask::spawn("market-status", period, move || {
        let current = hours.current_status();
        if current == last {
            return true;
        }
        last = current;
        status_tx.send(current).is_ok()
    })
}

fn write_sparklines(dir: &Path, store: &Arc<Mutex<TickerStore>>) -> Result<(), BrokerError> {
    let rendered: Vec<(String, String)> = {
        let store = store.lock()?;
        store
            .symbols()
            .iter()
            .filter_map(|symbol| {
                store.history(symbol).map(|history| {
                    (file_stem(symbol), sparkline_svg(history, SPARK_WIDTH, SPARK_HEIGHT))
                })
            })
            .collect()
    };
    for (stem, svg) in rendered {
        let path = dir.join(format!("{}.svg", stem));
        fs::write(&path, svg)?;
        debug!("Sparkline written to {}", path.display());
    }
    Ok(())
}

fn write_hero_chart(dir: &Path) -> Result<(), BrokerError> {
    let mut rng = rand::rng();
    let values = hero_values(&mut rng, HERO_POINTS, true);
    let path = dir.join("hero.svg");
    fs::write(&path, hero_chart_svg(&values, true))?;
    info!("Hero chart ({}x{}) written to {}", HERO_WIDTH, HERO_HEIGHT, path.display());
    Ok(())
}

fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
