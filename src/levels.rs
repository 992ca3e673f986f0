use serde::{Deserialize, Serialize};

use crate::bars::Bar;

/// Reference support/resistance for one trading day, derived from the
/// morning window's open/close prices. Wicks outside the body do not move
/// the levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLevels {
    pub support: f64,
    pub resistance: f64,
}

/// Compute the day's reference levels from the morning-window bars.
///
/// Returns `None` when the window is empty (holiday-shortened session with
/// no morning data); that day cannot produce a trade.
pub fn compute_reference_levels(window: &[Bar]) -> Option<ReferenceLevels> {
    if window.is_empty() {
        return None;
    }

    let support = window
        .iter()
        .flat_map(|b| [b.open, b.close])
        .fold(f64::MAX, f64::min);
    let resistance = window
        .iter()
        .flat_map(|b| [b.open, b.close])
        .fold(f64::MIN, f64::max);

    Some(ReferenceLevels {
        support,
        resistance,
    })
}
