// Library crate - exports the per-day trading rule and its collaborators

pub mod bars;
pub mod day;
pub mod fetch;
pub mod levels;
pub mod metrics;
pub mod signal;
pub mod simulate;
pub mod trade_log;

// Re-export commonly used types
pub use bars::Bar;
pub use day::{process_day, DayOutcome, SessionConfig};
pub use levels::ReferenceLevels;
pub use signal::Direction;
pub use simulate::{ExitReason, TradeRecord};
