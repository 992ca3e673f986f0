//! Per-day orchestration: range -> signal -> simulation.
//!
//! One call per trading day, pure and deterministic: the same bar sequence
//! always yields the same outcome. Day state never crosses a day boundary,
//! which is what makes re-running over an overlapping provider window safe
//! for already-recorded dates.

use chrono::{NaiveDate, NaiveTime};

use crate::bars::{session_split, Bar};
use crate::levels::compute_reference_levels;
use crate::signal::detect_signal;
use crate::simulate::{simulate_trade, TradeRecord};

/// Session clock times and window completeness for the day processor
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Morning reference window start (exchange-local)
    pub window_start: NaiveTime,
    /// Morning reference window end, inclusive (exchange-local)
    pub window_end: NaiveTime,
    /// Minimum bars the window must hold before levels count
    pub min_window_bars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // 09:30-11:30 ET, eight complete 15m bars expected
            window_start: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            window_end: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            min_window_bars: 8,
        }
    }
}

/// Result of processing one trading day
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    /// The rule entered and exited once
    Trade(TradeRecord),
    /// A bar violated `low <= open,close <= high`; whole day rejected
    MalformedBar,
    /// Morning window empty or below the completeness minimum
    NoWindow,
    /// No confirmed signal before the day ran out
    NoSignal,
    /// Confirmation landed on the day's final bar, entry impossible
    NoEntryBar,
}

impl DayOutcome {
    pub fn into_trade(self) -> Option<TradeRecord> {
        match self {
            DayOutcome::Trade(record) => Some(record),
            _ => None,
        }
    }
}

/// Process one day's sorted bars and yield at most one trade record.
pub fn process_day(date: NaiveDate, bars: &[Bar], config: &SessionConfig) -> DayOutcome {
    if bars.iter().any(|b| !b.is_well_formed()) {
        return DayOutcome::MalformedBar;
    }

    let (window, rest) = session_split(bars, config.window_start, config.window_end);
    if window.len() < config.min_window_bars {
        return DayOutcome::NoWindow;
    }

    let levels = match compute_reference_levels(window) {
        Some(levels) => levels,
        None => return DayOutcome::NoWindow,
    };

    let signal = match detect_signal(&levels, rest) {
        Some(signal) => signal,
        None => return DayOutcome::NoSignal,
    };

    // Forced close-out uses the last bar of the whole day
    let final_bar = match bars.last() {
        Some(bar) => bar,
        None => return DayOutcome::NoWindow,
    };

    match simulate_trade(date, signal.direction, signal.confirm_idx, &levels, rest, final_bar) {
        Some(record) => DayOutcome::Trade(record),
        None => DayOutcome::NoEntryBar,
    }
}
