//! Entry signal detection against the day's reference levels.
//!
//! A signal bar touches a level with its wick while its body stays on the
//! inside of that level; the next bar must extend price in the fade
//! direction to confirm. The first confirmed pair in time order wins and
//! scanning stops, so a day carries at most one entry.

use serde::{Deserialize, Serialize};

use crate::bars::Bar;
use crate::levels::ReferenceLevels;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "Long"),
            Direction::Short => write!(f, "Short"),
        }
    }
}

/// A confirmed entry signal; indices point into the post-window slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub direction: Direction,
    pub signal_idx: usize,
    pub confirm_idx: usize,
}

/// Scan the post-window bars for the first confirmed signal.
///
/// Touches are equality-inclusive on both the wick and the body bounds.
/// When support and resistance coincide, a bar can qualify both ways; the
/// long side is checked first and takes precedence.
pub fn detect_signal(levels: &ReferenceLevels, bars: &[Bar]) -> Option<Signal> {
    for i in 0..bars.len().saturating_sub(1) {
        let bar = &bars[i];
        let next = &bars[i + 1];

        // Long: wick dips to support, body holds above it.
        // Short: wick pokes resistance, body holds below it.
        if bar.low <= levels.support && bar.open >= levels.support && bar.close >= levels.support {
            if next.high > bar.high {
                return Some(Signal {
                    direction: Direction::Long,
                    signal_idx: i,
                    confirm_idx: i + 1,
                });
            }
        } else if bar.high >= levels.resistance
            && bar.open <= levels.resistance
            && bar.close <= levels.resistance
        {
            if next.low < bar.low {
                return Some(Signal {
                    direction: Direction::Short,
                    signal_idx: i,
                    confirm_idx: i + 1,
                });
            }
        }
    }

    None
}
