//! OHLC bar type and trading-day partitioning.
//!
//! Bars arrive from the provider in UTC; all session logic (day membership,
//! morning window) runs on exchange-local clock time.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Exchange time zone for session and day boundaries
pub const EXCHANGE_TZ: Tz = chrono_tz::America::New_York;

/// One fixed-interval OHLC price sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    /// True when `low <= open,close <= high`
    pub fn is_well_formed(&self) -> bool {
        self.low <= self.open.min(self.close) && self.high >= self.open.max(self.close)
    }

    /// Calendar trading day in exchange-local time
    pub fn trading_day(&self) -> NaiveDate {
        self.timestamp.with_timezone(&EXCHANGE_TZ).date_naive()
    }

    /// Bar-start clock time in exchange-local time
    pub fn local_time(&self) -> NaiveTime {
        self.timestamp.with_timezone(&EXCHANGE_TZ).time()
    }
}

/// Group bars by exchange-local calendar day, each day sorted by timestamp
pub fn group_by_trading_day(bars: &[Bar]) -> BTreeMap<NaiveDate, Vec<Bar>> {
    let mut days: BTreeMap<NaiveDate, Vec<Bar>> = BTreeMap::new();

    for bar in bars {
        days.entry(bar.trading_day()).or_default().push(*bar);
    }

    for day_bars in days.values_mut() {
        day_bars.sort_by_key(|b| b.timestamp);
    }

    days
}

/// Split one day's sorted bars into the morning reference window
/// `[window_start, window_end]` and the post-window remainder.
///
/// Bars before `window_start` (pre-market) land in neither slice.
pub fn session_split<'a>(
    bars: &'a [Bar],
    window_start: NaiveTime,
    window_end: NaiveTime,
) -> (&'a [Bar], &'a [Bar]) {
    let begin = bars.partition_point(|b| b.local_time() < window_start);
    let end = bars.partition_point(|b| b.local_time() <= window_end);
    (&bars[begin..end], &bars[end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar_at(day: u32, hour: u32, min: u32, open: f64, high: f64, low: f64, close: f64) -> Bar {
        let ts = EXCHANGE_TZ
            .with_ymd_and_hms(2025, 6, day, hour, min, 0)
            .unwrap()
            .with_timezone(&Utc);
        Bar {
            timestamp: ts,
            open,
            high,
            low,
            close,
        }
    }

    #[test]
    fn test_well_formed() {
        let good = bar_at(2, 10, 0, 101.0, 103.0, 99.0, 102.0);
        assert!(good.is_well_formed());

        // High below the close
        let bad = Bar {
            high: 101.5,
            ..good
        };
        assert!(!bad.is_well_formed());

        // Low above the open
        let bad = Bar { low: 101.5, ..good };
        assert!(!bad.is_well_formed());
    }

    #[test]
    fn test_trading_day_uses_exchange_time() {
        // 13:30 UTC on June 2 is 09:30 ET the same day (EDT)
        let bar = bar_at(2, 9, 30, 100.0, 100.0, 100.0, 100.0);
        assert_eq!(bar.trading_day(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(bar.local_time(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn test_group_by_trading_day() {
        let bars = vec![
            bar_at(3, 9, 45, 1.0, 1.0, 1.0, 1.0),
            bar_at(2, 9, 30, 1.0, 1.0, 1.0, 1.0),
            bar_at(3, 9, 30, 1.0, 1.0, 1.0, 1.0),
        ];

        let days = group_by_trading_day(&bars);
        assert_eq!(days.len(), 2);

        let june3 = &days[&NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()];
        assert_eq!(june3.len(), 2);
        assert!(june3[0].timestamp < june3[1].timestamp);
    }

    #[test]
    fn test_session_split_bounds() {
        let bars = vec![
            bar_at(2, 9, 15, 1.0, 1.0, 1.0, 1.0),  // pre-market
            bar_at(2, 9, 30, 1.0, 1.0, 1.0, 1.0),  // window start
            bar_at(2, 11, 30, 1.0, 1.0, 1.0, 1.0), // window end, inclusive
            bar_at(2, 11, 45, 1.0, 1.0, 1.0, 1.0), // first post-window bar
            bar_at(2, 15, 45, 1.0, 1.0, 1.0, 1.0),
        ];

        let start = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        let end = NaiveTime::from_hms_opt(11, 30, 0).unwrap();
        let (window, rest) = session_split(&bars, start, end);

        assert_eq!(window.len(), 2);
        assert_eq!(window[0].local_time(), start);
        assert_eq!(window[1].local_time(), end);
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].local_time(), NaiveTime::from_hms_opt(11, 45, 0).unwrap());
    }
}
