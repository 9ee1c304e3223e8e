//! Refresh driver and event broadcasting.
//!
//! The `RefreshDriver` owns a `PeriodicTask` that perturbs every quote in the shared
//! `TickerStore` on a fixed interval and broadcasts the resulting snapshot to all
//! subscribers using `crossbeam_channel`.
//!
//! Event model:
//! - `TickerEvent::Tick(Vec<Quote>)`: every quote after one refresh, in watchlist order.
//! - `TickerEvent::Shutdown`: the driver stopped; consumers should finish.
//!
//! Design notes:
//! - Each tick walks from the previous tick's price, not from the baseline, so prices
//!   drift over a long session. `change`/`percent` are always relative to the baseline.
//! - A move is bounded by the instrument's `Volatility` and never goes below its floor.
//! - Broadcast is best-effort: a subscriber whose receiver was dropped is removed.

use crate::model::periodic::PeriodicTask;
use crate::model::ticker_store::TickerStore;
use broker_common::BrokerError;
use broker_common::instruments::{Instrument, Volatility};
use broker_common::quote::Quote;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error, info};
use rand::Rng;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Message sent by the driver to its subscribers.
#[derive(Debug, Clone)]
pub enum TickerEvent {
    /// Snapshot of every quote after a refresh.
    Tick(Vec<Quote>),
    /// The driver was stopped.
    Shutdown,
}

/// Next price for one tick.
///
/// The delta is drawn uniformly from `[-k, +k]` where `k = volatility.bound(price)`,
/// and the result is clamped to `floor`.
pub fn next_price<R: Rng + ?Sized>(
    rng: &mut R,
    price: f64,
    volatility: Volatility,
    floor: f64,
) -> f64 {
    let bound = volatility.bound(price);
    let delta = if bound > 0.0 {
        rng.random_range(-bound..=bound)
    } else {
        0.0
    };
    (price + delta).max(floor)
}

/// Synthetic volume label such as `2.7M`, or `None` when the instrument has no volume.
pub fn synthetic_volume<R: Rng + ?Sized>(rng: &mut R, instrument: &Instrument) -> Option<String> {
    if !instrument.segment.has_volume() {
        return None;
    }
    let millions: f64 = rng.random_range(1.0..4.0);
    Some(format!("{:.1}M", millions))
}

/// Background driver for the mock ticker.
pub struct RefreshDriver;

impl RefreshDriver {
    /// Apply one refresh to every instrument in `store` and return the new snapshot.
    pub fn tick_once<R: Rng + ?Sized>(
        store: &mut TickerStore,
        rng: &mut R,
    ) -> Result<Vec<Quote>, BrokerError> {
        for instrument in store.instruments() {
            let current = store
                .quote(&instrument.symbol)
                .map(|q| q.price)
                .unwrap_or(instrument.baseline);
            let price = next_price(rng, current, instrument.volatility(), instrument.floor());
            let volume = synthetic_volume(rng, &instrument);
            store.apply(&instrument.symbol, price, volume)?;
        }
        Ok(store.snapshot())
    }

    /// Start refreshing `store` every `interval`.
    ///
    /// The returned handle owns the timer; dropping it stops the refresh and notifies
    /// subscribers with `TickerEvent::Shutdown`.
    pub fn start(
        store: Arc<Mutex<TickerStore>>,
        interval: Duration,
    ) -> Result<RefreshHandle, BrokerError> {
        let subscribers: Arc<Mutex<Vec<Sender<TickerEvent>>>> = Arc::new(Mutex::new(Vec::new()));
        let broadcast_to = Arc::clone(&subscribers);

        let task = PeriodicTask::spawn("refresh-driver", interval, move || {
            let mut rng = rand::rng();
            let snapshot = match store.lock() {
                Ok(mut guard) => match Self::tick_once(&mut guard, &mut rng) {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        error!("Refresh tick failed: {}", e);
                        return false;
                    }
                },
                Err(e) => {
                    error!("Ticker store unavailable: {}", e);
                    return false;
                }
            };

            let event = TickerEvent::Tick(snapshot);
            match broadcast_to.lock() {
                Ok(mut clients) => {
                    clients.retain(|client_tx| client_tx.send(event.clone()).is_ok());
                    debug!("Tick delivered to {} subscriber(s)", clients.len());
                    true
                }
                Err(e) => {
                    error!("Subscriber list unavailable: {}", e);
                    false
                }
            }
        })?;

        info!("Refresh driver started, interval {:?}", interval);
        Ok(RefreshHandle {
            task: Some(task),
            subscribers,
        })
    }
}

/// Owned handle to a running [`RefreshDriver`].
pub struct RefreshHandle {
    task: Option<PeriodicTask>,
    subscribers: Arc<Mutex<Vec<Sender<TickerEvent>>>>,
}

impl RefreshHandle {
    /// Register a new subscriber; it receives every tick from now on.
    pub fn subscribe(&self) -> Result<Receiver<TickerEvent>, BrokerError> {
        let (tx, rx) = unbounded::<TickerEvent>();
        let mut clients = self.subscribers.lock()?;
        clients.push(tx);
        info!("Driver: new subscriber added. Total subscribers: {}", clients.len());
        Ok(rx)
    }

    /// Number of live subscribers as of the last broadcast.
    pub fn subscriber_count(&self) -> Result<usize, BrokerError> {
        Ok(self.subscribers.lock()?.len())
    }

    /// True while the refresh timer is running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop refreshing and notify subscribers.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        task.cancel();

        match self.subscribers.lock() {
            Ok(mut clients) => {
                for client_tx in clients.drain(..) {
                    let _ = client_tx.send(TickerEvent::Shutdown);
                }
            }
            Err(e) => error!("Could not notify subscribers of shutdown: {}", e),
        }
        info!("Refresh driver stopped");
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
