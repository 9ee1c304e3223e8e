//! Error types shared between the ticker and the contact form.
//!
//! The `BrokerError` enum unifies common failure cases for I/O, serialization,
//! channel communication, configuration and internal logic, allowing crates to
//! propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by every crate in the workspace.
#[derive(Error, Debug)]
pub enum BrokerError {
    /// I/O error originating from the standard library or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Error while parsing the instruments file into `Instrument` values.
    #[error("Parse instruments file error: {0}")]
    ParseInstrumentsFile(String),

    /// Rejected configuration value; contains the offending setting.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Crossbeam/channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// Internal logic error where a requested symbol is not on the watchlist.
    #[error("Internal Logic Error: Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The (simulated) contact submission was rejected.
    #[error("Submission failed: {0}")]
    Submission(String),
}

impl<T> From<PoisonError<T>> for BrokerError {
    fn from(err: PoisonError<T>) -> Self {
        BrokerError::MutexLock(err.to_string())
    }
}
