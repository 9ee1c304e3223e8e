//! Watchlist instruments and helpers shared by the ticker and its renderers.

use serde::{Deserialize, Serialize};
use std::io::BufRead;
use strum_macros::{Display, EnumString};

use crate::error::BrokerError;

/// Trait providing file parsing for instruments.
pub trait InstrumentParser {
    /// Parses instruments from a buffered reader.
    ///
    /// Each non-empty line has the form `SYMBOL,baseline[,segment[,volume]]`. Lines
    /// starting with `#` are comments. The segment defaults to `equity` when omitted.
    /// The baseline may not be below the segment's price floor.
    /// Returns an error if any line cannot be parsed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Instrument>, BrokerError>;
}

impl InstrumentParser for Instrument {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, BrokerError> {
        let mut instruments = Vec::new();

        for (idx, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(BrokerError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            let instrument = parse_line(trimmed_line)
                .map_err(|e| BrokerError::ParseInstrumentsFile(format!("line {}: {}", idx + 1, e)))?;
            instruments.push(instrument);
        }
        Ok(instruments)
    }
}

fn parse_line(line: &str) -> Result<Instrument, String> {
    let mut parts = line.split(',').map(str::trim);

    let symbol = match parts.next() {
        Some(s) if !s.is_empty() => s,
        _ => return Err("missing symbol".to_string()),
    };
    let baseline: f64 = parts
        .next()
        .ok_or_else(|| format!("missing baseline price for {}", symbol))?
        .parse()
        .map_err(|e| format!("invalid baseline price for {}: {}", symbol, e))?;
    if !baseline.is_finite() || baseline <= 0.0 {
        return Err(format!("baseline price for {} must be positive", symbol));
    }
    let segment = match parts.next() {
        Some(raw) if !raw.is_empty() => raw
            .parse::<Segment>()
            .map_err(|e| format!("invalid segment {:?}: {}", raw, e))?,
        _ => Segment::Equity,
    };
    if baseline < segment.floor() {
        return Err(format!(
            "baseline price for {} is below the {} floor of {}",
            symbol,
            segment,
            segment.floor()
        ));
    }
    let seed_volume = match parts.next() {
        Some(raw) if !raw.is_empty() => Some(raw.to_string()),
        _ => None,
    };
    if parts.next().is_some() {
        return Err(format!("too many columns for {}", symbol));
    }

    let instrument = Instrument::new(symbol, baseline, segment);
    Ok(match seed_volume {
        Some(label) => instrument.with_volume(&label),
        None => instrument,
    })
}

/// How far a single refresh tick may move a price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Volatility {
    /// Delta bounded by a fraction of the current price (`0.003` = 0.3%).
    Relative(f64),
    /// Delta bounded by a fixed absolute amount in price units.
    Absolute(f64),
}

impl Volatility {
    /// Largest allowed absolute move away from `price` for one tick.
    pub fn bound(&self, price: f64) -> f64 {
        match *self {
            Volatility::Relative(fraction) => (price * fraction).abs(),
            Volatility::Absolute(amount) => amount.abs(),
        }
    }
}

/// Market segment an instrument is listed under.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, Hash, Eq, PartialEq,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    /// Single stocks.
    Equity,
    /// Benchmark indices.
    Indices,
}

impl Segment {
    /// Per-tick volatility used for instruments of this segment.
    pub fn volatility(&self) -> Volatility {
        match self {
            Segment::Equity => Volatility::Absolute(2.5),
            Segment::Indices => Volatility::Relative(0.003),
        }
    }

    /// Lowest price a refresh tick may produce.
    pub fn floor(&self) -> f64 {
        match self {
            Segment::Equity => 10.0,
            Segment::Indices => 100.0,
        }
    }

    /// Whether quotes in this segment carry a traded volume.
    pub fn has_volume(&self) -> bool {
        matches!(self, Segment::Equity)
    }
}

/// A watchlist entry: symbol, the seed price every change is measured from, and segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Display symbol, e.g. `RELIANCE` or `NIFTY 50`.
    pub symbol: String,
    /// Seed price; `change` and `percent` are computed against it.
    pub baseline: f64,
    /// Segment driving volatility, floor and volume display.
    pub segment: Segment,
    /// Volume label shown before the first refresh, e.g. `2.5M`.
    #[serde(default)]
    pub seed_volume: Option<String>,
}

impl Instrument {
    /// Creates a new instrument.
    pub fn new(symbol: &str, baseline: f64, segment: Segment) -> Self {
        Instrument {
            symbol: String::from(symbol),
            baseline,
            segment,
            seed_volume: None,
        }
    }

    /// Sets the volume label shown before the first refresh.
    pub fn with_volume(mut self, label: &str) -> Self {
        self.seed_volume = Some(String::from(label));
        self
    }

    /// Shortcut for `self.segment.volatility()`.
    pub fn volatility(&self) -> Volatility {
        self.segment.volatility()
    }

    /// Shortcut for `self.segment.floor()`.
    pub fn floor(&self) -> f64 {
        self.segment.floor()
    }
}

/// The watchlist shown on the home page ticker.
pub fn default_watchlist() -> Vec<Instrument> {
    vec![
        Instrument::new("RELIANCE", 2856.75, Segment::Equity).with_volume("2.5M"),
        Instrument::new("TCS", 3850.20, Segment::Equity).with_volume("1.8M"),
        Instrument::new("INFY", 1650.80, Segment::Equity).with_volume("3.2M"),
        Instrument::new("HDFCBANK", 1658.90, Segment::Equity).with_volume("4.1M"),
        Instrument::new("ICICIBANK", 1050.30, Segment::Equity).with_volume("5.2M"),
        Instrument::new("NIFTY 50", 22123.45, Segment::Indices),
        Instrument::new("BANKNIFTY", 47123.89, Segment::Indices),
    ]
}
