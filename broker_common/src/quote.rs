//! Quote data model and JSON encoding helpers.
//!
//! A `Quote` is what the ticker bar renders for one instrument: the last price, the
//! change and percent change against the instrument's baseline, an optional synthetic
//! volume label and a millisecond UTC timestamp.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::BrokerError;
use crate::instruments::Instrument;

/// Market quote for a single instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol identifier.
    pub symbol: String,
    /// Last price.
    pub price: f64,
    /// Signed difference between `price` and the instrument baseline.
    pub change: f64,
    /// `change / baseline * 100`, computed together with `change`.
    pub percent: f64,
    /// Volume label such as `2.5M`; `None` for instruments without volume (indices).
    pub volume: Option<String>,
    /// UTC timestamp in milliseconds since Unix epoch.
    pub timestamp: u64,
}

impl Quote {
    /// Initial quote for `instrument`: priced at its baseline with no change.
    ///
    /// Carries the instrument's seed volume label when its segment shows volume.
    pub fn seed(instrument: &Instrument) -> Quote {
        let volume = if instrument.segment.has_volume() {
            instrument.seed_volume.clone()
        } else {
            None
        };
        Quote {
            symbol: instrument.symbol.clone(),
            price: instrument.baseline,
            change: 0.0,
            percent: 0.0,
            volume,
            timestamp: now_millis(),
        }
    }

    /// Move the quote to `price` and recompute `change` and `percent` against `baseline`.
    pub fn reprice(&mut self, price: f64, baseline: f64, volume: Option<String>) {
        self.price = price;
        self.change = price - baseline;
        self.percent = if baseline != 0.0 {
            self.change / baseline * 100.0
        } else {
            0.0
        };
        self.volume = volume;
        self.timestamp = now_millis();
    }

    /// Whether the quote is at or above its baseline.
    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }

    /// Encode the quote to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, BrokerError> {
        let json = serde_json::to_vec(self)?;
        Ok(json)
    }
}

fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::Segment;

    #[test]
    fn seed_is_flat_at_baseline() {
        let q = Quote::seed(&Instrument::new("TCS", 3850.2, Segment::Equity));
        assert_eq!(q.price, 3850.2);
        assert_eq!(q.change, 0.0);
        assert_eq!(q.percent, 0.0);
        assert!(q.is_up());
    }

    #[test]
    fn seed_carries_volume_for_equities_only() {
        let equity = Instrument::new("TCS", 3850.2, Segment::Equity).with_volume("1.8M");
        assert_eq!(Quote::seed(&equity).volume.as_deref(), Some("1.8M"));

        let index = Instrument::new("NIFTY 50", 22123.45, Segment::Indices).with_volume("9.9M");
        assert_eq!(Quote::seed(&index).volume, None);

        for instrument in crate::instruments::default_watchlist() {
            let seeded = Quote::seed(&instrument);
            assert_eq!(seeded.volume.is_some(), instrument.segment.has_volume());
        }
    }

    #[test]
    fn reprice_recomputes_change_and_percent() {
        let mut q = Quote::seed(&Instrument::new("INFY", 200.0, Segment::Equity));
        q.reprice(190.0, 200.0, Some("1.2M".to_string()));

        assert_eq!(q.change, -10.0);
        assert!((q.percent - (-5.0)).abs() < 1e-12);
        assert!(!q.is_up());
        assert_eq!(q.volume.as_deref(), Some("1.2M"));
    }

    #[test]
    fn json_uses_field_names() {
        let q = Quote::seed(&Instrument::new("NIFTY 50", 22123.45, Segment::Indices));
        let value: serde_json::Value = serde_json::from_slice(&q.to_json_bytes().unwrap()).unwrap();
        assert_eq!(value["symbol"], "NIFTY 50");
        assert!(value["volume"].is_null());
    }
}
