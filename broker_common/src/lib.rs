//!
//! Common types and utilities shared by the market ticker and the contact form.
//!
//! This crate aggregates:
//! - `error`: unified error type `BrokerError` used across the workspace.
//! - `result`: handy `Result<T, BrokerError>` alias.
//! - `instruments`: watchlist instruments, segments and parsing helpers.
//! - `quote`: the quote payload rendered by the ticker bar.
//! - `history`: fixed-capacity price history feeding sparklines.
//! - `market_hours`: Open/Closed gate computed from the wall clock.
//! - `paths`: normalization of paths given on the command line.
//! - `storage`: key/value stores standing in for browser local storage.
#![warn(missing_docs)]
pub mod error;
pub mod history;
pub mod instruments;
pub mod market_hours;
pub mod paths;
pub mod quote;
pub mod result;
pub mod storage;

pub use error::BrokerError;
pub use result::Result;
pub use quote::Quote;
