//! Decorative market Open/Closed gate.
//!
//! The status is computed from the wall clock only; there is no exchange feed
//! behind it. Two windows are supported:
//!
//! - `MarketHours::LocalWindow`: the viewer's local hour in `[open_hour, close_hour)`.
//! - `MarketHours::ExchangeWindow`: UTC shifted by a fixed offset (IST by default)
//!   and compared against an `HH:MM` window, both ends inclusive.
//!
//! `status_at` is pure and takes the instant explicitly so it can be tested;
//! `current_status` reads `Utc::now()`.

use chrono::{DateTime, FixedOffset, Local, NaiveTime, Timelike, Utc};
use clap::ValueEnum;
use strum_macros::Display;

/// Offset of India Standard Time from UTC, in minutes.
pub const IST_OFFSET_MINUTES: i32 = 330;

/// Whether the market is considered open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MarketStatus {
    /// Inside the trading window.
    Open,
    /// Outside the trading window.
    Closed,
}

/// Which window to evaluate, as chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum HoursPolicy {
    /// Local clock, 09:00 to 16:00.
    Local,
    /// Exchange clock (IST), 09:15 to 15:30.
    Exchange,
}

/// Trading window used to derive a [`MarketStatus`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarketHours {
    /// Viewer's local hour in `[open_hour, close_hour)`.
    LocalWindow {
        /// First open hour (0-23).
        open_hour: u32,
        /// First closed hour (0-23).
        close_hour: u32,
    },
    /// Fixed-offset exchange time in `[open, close]`.
    ExchangeWindow {
        /// Exchange offset from UTC in minutes (east positive).
        utc_offset_minutes: i32,
        /// Opening bell.
        open: NaiveTime,
        /// Closing bell.
        close: NaiveTime,
    },
}

impl From<HoursPolicy> for MarketHours {
    fn from(policy: HoursPolicy) -> Self {
        match policy {
            HoursPolicy::Local => MarketHours::local(),
            HoursPolicy::Exchange => MarketHours::exchange(),
        }
    }
}

impl Default for MarketHours {
    fn default() -> Self {
        MarketHours::local()
    }
}

impl MarketHours {
    /// 09:00–16:00 on the local clock.
    pub fn local() -> Self {
        MarketHours::LocalWindow {
            open_hour: 9,
            close_hour: 16,
        }
    }

    /// 09:15–15:30 IST.
    pub fn exchange() -> Self {
        MarketHours::ExchangeWindow {
            utc_offset_minutes: IST_OFFSET_MINUTES,
            open: NaiveTime::from_hms_opt(9, 15, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(15, 30, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    /// Status at `now` with local time resolved through the system timezone.
    pub fn status_at(&self, now: DateTime<Utc>) -> MarketStatus {
        match *self {
            MarketHours::LocalWindow { .. } => self
                .status_for_local_hour(now.with_timezone(&Local).hour())
                .unwrap_or(MarketStatus::Closed),
            MarketHours::ExchangeWindow {
                utc_offset_minutes,
                open,
                close,
            } => {
                let Some(offset) = FixedOffset::east_opt(utc_offset_minutes * 60) else {
                    return MarketStatus::Closed;
                };
                let t = now.with_timezone(&offset).time();
                if t >= open && t <= close {
                    MarketStatus::Open
                } else {
                    MarketStatus::Closed
                }
            }
        }
    }

    /// Status for an already-resolved local hour; `None` for exchange windows,
    /// which need the full instant.
    pub fn status_for_local_hour(&self, hour: u32) -> Option<MarketStatus> {
        match *self {
            MarketHours::LocalWindow {
                open_hour,
                close_hour,
            } => Some(if hour >= open_hour && hour < close_hour {
                MarketStatus::Open
            } else {
                MarketStatus::Closed
            }),
            MarketHours::ExchangeWindow { .. } => None,
        }
    }

    /// Status right now.
    pub fn current_status(&self) -> MarketStatus {
        self.status_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 12, h, m, 0).unwrap()
    }

    #[test]
    fn local_window_is_half_open() {
        let hours = MarketHours::local();
        assert_eq!(hours.status_for_local_hour(8), Some(MarketStatus::Closed));
        assert_eq!(hours.status_for_local_hour(9), Some(MarketStatus::Open));
        assert_eq!(hours.status_for_local_hour(15), Some(MarketStatus::Open));
        assert_eq!(hours.status_for_local_hour(16), Some(MarketStatus::Closed));
        assert_eq!(hours.status_for_local_hour(23), Some(MarketStatus::Closed));
    }

    #[test]
    fn exchange_window_converts_from_utc() {
        let hours = MarketHours::exchange();
        // 03:45 UTC == 09:15 IST
        assert_eq!(hours.status_at(utc(3, 44)), MarketStatus::Closed);
        assert_eq!(hours.status_at(utc(3, 45)), MarketStatus::Open);
        // 10:00 UTC == 15:30 IST
        assert_eq!(hours.status_at(utc(10, 0)), MarketStatus::Open);
        assert_eq!(hours.status_at(utc(10, 1)), MarketStatus::Closed);
        assert_eq!(hours.status_at(utc(20, 0)), MarketStatus::Closed);
        assert_eq!(hours.status_for_local_hour(10), None);
    }

    #[test]
    fn policy_maps_to_window() {
        assert_eq!(MarketHours::from(HoursPolicy::Local), MarketHours::local());
        assert_eq!(MarketHours::from(HoursPolicy::Exchange), MarketHours::exchange());
        assert_eq!(MarketStatus::Open.to_string(), "Open");
    }
}
