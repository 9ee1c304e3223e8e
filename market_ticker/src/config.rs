//! Ticker configuration assembled from command-line arguments.

use broker_common::BrokerError;
use broker_common::history::HISTORY_CAPACITY;
use broker_common::instruments::{Instrument, default_watchlist};
use broker_common::market_hours::MarketHours;
use std::collections::HashSet;
use std::time::Duration;

/// Default refresh interval of the ticker.
pub const DEFAULT_INTERVAL_MS: u64 = 2000;
/// Default period between market status checks.
pub const DEFAULT_STATUS_POLL_SECS: u64 = 60;

/// Everything the refresh loop needs to run.
///
/// Volatility and price floors are per instrument (see `Segment`), so they are
/// not repeated here.
#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// Watchlist in display order.
    pub instruments: Vec<Instrument>,
    /// Time between refresh ticks.
    pub interval: Duration,
    /// Number of points kept per symbol for sparklines.
    pub history_length: usize,
    /// Trading window for the Open/Closed label.
    pub market_hours: MarketHours,
    /// Time between market status checks.
    pub status_poll: Duration,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            instruments: default_watchlist(),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            history_length: HISTORY_CAPACITY,
            market_hours: MarketHours::default(),
            status_poll: Duration::from_secs(DEFAULT_STATUS_POLL_SECS),
        }
    }
}

impl TickerConfig {
    /// Check the configuration before any thread is started.
    pub fn validate(&self) -> Result<(), BrokerError> {
        if self.instruments.is_empty() {
            return Err(BrokerError::InvalidConfig("watchlist is empty".to_string()));
        }
        if self.interval.is_zero() {
            return Err(BrokerError::InvalidConfig(
                "refresh interval must be positive".to_string(),
            ));
        }
        if self.status_poll.is_zero() {
            return Err(BrokerError::InvalidConfig(
                "status poll interval must be positive".to_string(),
            ));
        }
        if self.history_length == 0 {
            return Err(BrokerError::InvalidConfig(
                "history length must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if !seen.insert(instrument.symbol.as_str()) {
                return Err(BrokerError::InvalidConfig(format!(
                    "duplicate symbol {}",
                    instrument.symbol
                )));
            }
            if !instrument.baseline.is_finite() || instrument.baseline <= 0.0 {
                return Err(BrokerError::InvalidConfig(format!(
                    "baseline for {} must be positive",
                    instrument.symbol
                )));
            }
            if instrument.baseline < instrument.floor() {
                return Err(BrokerError::InvalidConfig(format!(
                    "baseline for {} is below its price floor {}",
                    instrument.symbol,
                    instrument.floor()
                )));
            }
        }
        Ok(())
    }
}
