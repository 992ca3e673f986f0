//! Position simulation from a confirmed entry to its exit.
//!
//! Entry fills at the open of the bar after the confirmation bar. The exit
//! is either a confirmed reversal at the opposite reference level or the
//! forced close-out on the day's final bar. Exactly one exit per trade.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::bars::Bar;
use crate::levels::ReferenceLevels;
use crate::signal::Direction;

/// Why a trade was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    ConfirmedReversal,
    MarketClose,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitReason::ConfirmedReversal => write!(f, "ConfirmedReversal"),
            ExitReason::MarketClose => write!(f, "MarketClose"),
        }
    }
}

/// The persisted unit: one completed round trip for one trading day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub direction: Direction,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_time: DateTime<Utc>,
    pub exit_price: f64,
    pub exit_reason: ExitReason,
    pub pnl: f64,
}

/// Simulate a confirmed entry through to its exit.
///
/// `bars` is the post-window slice the signal was detected on;
/// `final_bar` is the last bar of the whole day, used for the forced
/// close-out. Returns `None` when no bar follows the confirmation bar
/// (entry impossible, no trade for the day).
pub fn simulate_trade(
    date: NaiveDate,
    direction: Direction,
    confirm_idx: usize,
    levels: &ReferenceLevels,
    bars: &[Bar],
    final_bar: &Bar,
) -> Option<TradeRecord> {
    let entry_idx = confirm_idx + 1;
    let entry_bar = bars.get(entry_idx)?;
    let entry_price = entry_bar.open;

    // Confirmed reversal: bar i touches the opposite level, bar i+1 extends
    // against the position, fill at the open of bar i+2. All three bars
    // must exist within the day.
    for i in entry_idx..bars.len().saturating_sub(2) {
        let touch = &bars[i];
        let follow = &bars[i + 1];

        let reversal = match direction {
            Direction::Long => touch.high >= levels.resistance && follow.low < touch.low,
            Direction::Short => touch.low <= levels.support && follow.high > touch.high,
        };

        if reversal {
            let exit_bar = &bars[i + 2];
            return Some(build_record(
                date,
                direction,
                entry_bar,
                entry_price,
                exit_bar.timestamp,
                exit_bar.open,
                ExitReason::ConfirmedReversal,
            ));
        }
    }

    // No reversal completed before the day ran out: close with the market
    Some(build_record(
        date,
        direction,
        entry_bar,
        entry_price,
        final_bar.timestamp,
        final_bar.close,
        ExitReason::MarketClose,
    ))
}

fn build_record(
    date: NaiveDate,
    direction: Direction,
    entry_bar: &Bar,
    entry_price: f64,
    exit_time: DateTime<Utc>,
    exit_price: f64,
    exit_reason: ExitReason,
) -> TradeRecord {
    let pnl = match direction {
        Direction::Long => exit_price - entry_price,
        Direction::Short => entry_price - exit_price,
    };

    TradeRecord {
        date,
        direction,
        entry_time: entry_bar.timestamp,
        entry_price,
        exit_time,
        exit_price,
        exit_reason,
        pnl,
    }
}
