//! In-memory ticker state: current quote and price history per symbol.
//!
//! The store is owned by the refresh driver behind an `Arc<Mutex<_>>`; renderers take
//! a `snapshot()` or clone a single history instead of holding the lock while drawing.

use broker_common::BrokerError;
use broker_common::history::PriceHistory;
use broker_common::instruments::Instrument;
use broker_common::quote::Quote;
use std::collections::HashMap;

struct Entry {
    instrument: Instrument,
    quote: Quote,
    history: PriceHistory,
}

/// Quotes and histories for a watchlist, kept in watchlist order.
pub struct TickerStore {
    order: Vec<String>,
    entries: HashMap<String, Entry>,
}

impl TickerStore {
    /// Seed every instrument at its baseline with a flat history of `history_len` points.
    pub fn new(instruments: &[Instrument], history_len: usize) -> Result<Self, BrokerError> {
        let mut order = Vec::with_capacity(instruments.len());
        let mut entries = HashMap::with_capacity(instruments.len());

        for instrument in instruments {
            if entries.contains_key(&instrument.symbol) {
                return Err(BrokerError::InvalidConfig(format!(
                    "duplicate symbol {}",
                    instrument.symbol
                )));
            }
            let entry = Entry {
                instrument: instrument.clone(),
                quote: Quote::seed(instrument),
                history: PriceHistory::filled(history_len, instrument.baseline)?,
            };
            order.push(instrument.symbol.clone());
            entries.insert(instrument.symbol.clone(), entry);
        }
        Ok(Self { order, entries })
    }

    /// Record a new price for `symbol`: reprice the quote and append to its history.
    pub fn apply(
        &mut self,
        symbol: &str,
        price: f64,
        volume: Option<String>,
    ) -> Result<&Quote, BrokerError> {
        let entry = self
            .entries
            .get_mut(symbol)
            .ok_or_else(|| BrokerError::SymbolNotFound(symbol.to_string()))?;
        entry.quote.reprice(price, entry.instrument.baseline, volume);
        entry.history.append(price);
        Ok(&entry.quote)
    }

    /// Current quote for `symbol`.
    pub fn quote(&self, symbol: &str) -> Option<&Quote> {
        self.entries.get(symbol).map(|e| &e.quote)
    }

    /// Price history for `symbol`.
    pub fn history(&self, symbol: &str) -> Option<&PriceHistory> {
        self.entries.get(symbol).map(|e| &e.history)
    }

    /// Instrument definition for `symbol`.
    pub fn instrument(&self, symbol: &str) -> Option<&Instrument> {
        self.entries.get(symbol).map(|e| &e.instrument)
    }

    /// Symbols in watchlist order.
    pub fn symbols(&self) -> &[String] {
        &self.order
    }

    /// Instruments in watchlist order.
    pub fn instruments(&self) -> Vec<Instrument> {
        self.order
            .iter()
            .filter_map(|s| self.instrument(s).cloned())
            .collect()
    }

    /// Copy of every quote in watchlist order.
    pub fn snapshot(&self) -> Vec<Quote> {
        self.order
            .iter()
            .filter_map(|s| self.quote(s).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_common::instruments::{Segment, default_watchlist};

    #[test]
    fn seeds_in_watchlist_order() {
        let store = TickerStore::new(&default_watchlist(), 20).unwrap();
        let symbols: Vec<_> = store.snapshot().into_iter().map(|q| q.symbol).collect();
        assert_eq!(symbols.first().map(String::as_str), Some("RELIANCE"));
        assert_eq!(symbols.last().map(String::as_str), Some("BANKNIFTY"));
        assert_eq!(store.history("TCS").unwrap().values(), vec![3850.2; 20]);
    }

    #[test]
    fn apply_updates_quote_and_history() {
        let instruments = vec![Instrument::new("ABC", 100.0, Segment::Equity)];
        let mut store = TickerStore::new(&instruments, 3).unwrap();

        let quote = store.apply("ABC", 110.0, Some("2.0M".into())).unwrap();
        assert_eq!(quote.change, 10.0);
        assert!((quote.percent - 10.0).abs() < 1e-9);

        store.apply("ABC", 90.0, None).unwrap();
        assert_eq!(store.history("ABC").unwrap().values(), vec![100.0, 110.0, 90.0]);
        assert_eq!(store.quote("ABC").unwrap().change, -10.0);
    }

    #[test]
    fn unknown_symbol_and_duplicates_are_errors() {
        let instruments = vec![Instrument::new("ABC", 100.0, Segment::Equity)];
        let mut store = TickerStore::new(&instruments, 3).unwrap();
        assert!(matches!(
            store.apply("XYZ", 1.0, None),
            Err(BrokerError::SymbolNotFound(s)) if s == "XYZ"
        ));

        let dup = vec![instruments[0].clone(), instruments[0].clone()];
        assert!(TickerStore::new(&dup, 3).is_err());
    }
}
