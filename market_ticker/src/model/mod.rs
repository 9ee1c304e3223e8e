//! Domain models and utilities for the mock market ticker.
//!
//! This module groups the state and timing pieces of the refresh loop:
//! - `ticker_store`: current quotes and price histories, in watchlist order.
//! - `periodic`: owned handle for a repeating job with cancellation on drop.
//! - `refresh_driver`: background price perturbation and `TickerEvent` broadcasting.

pub mod periodic;
pub mod refresh_driver;
pub mod ticker_store;
