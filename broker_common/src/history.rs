//! Fixed-capacity price history used to draw sparklines.
//!
//! `PriceHistory` keeps the last `capacity` prices for one symbol, oldest first.
//! Appending past capacity evicts the oldest value. A fresh history is filled with
//! the seed price so the first sparkline is a flat line.

use std::collections::VecDeque;

use crate::error::BrokerError;

/// Number of points kept per symbol by default.
pub const HISTORY_CAPACITY: usize = 20;

/// Ring buffer of recent prices for a single symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    values: VecDeque<f64>,
    capacity: usize,
}

impl PriceHistory {
    /// Creates a history of `capacity` entries, all equal to `seed`.
    pub fn filled(capacity: usize, seed: f64) -> Result<Self, BrokerError> {
        if capacity == 0 {
            return Err(BrokerError::InvalidConfig(
                "history capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            values: std::iter::repeat_n(seed, capacity).collect(),
            capacity,
        })
    }

    /// Appends `value` as the newest entry, dropping the oldest one when full.
    pub fn append(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a history built with [`Self::filled`].
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Maximum number of stored values.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Values from oldest to newest.
    pub fn values(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Iterator from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Oldest stored value.
    pub fn oldest(&self) -> Option<f64> {
        self.values.front().copied()
    }

    /// Most recently appended value.
    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Smallest stored value.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Largest stored value.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// `max - min`; zero while the history is still flat.
    pub fn range(&self) -> f64 {
        match (self.min(), self.max()) {
            (Some(min), Some(max)) => max - min,
            _ => 0.0,
        }
    }

    /// True when the newest value is at or above the oldest one.
    pub fn is_rising(&self) -> bool {
        match (self.oldest(), self.latest()) {
            (Some(first), Some(last)) => last >= first,
            _ => true,
        }
    }
}
