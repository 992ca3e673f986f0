//! Derived performance summary over the trade log.

use crate::simulate::TradeRecord;

/// Aggregate statistics for a set of trade records
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub max_drawdown: f64,
}

/// Compute the summary. Drawdown is measured on the cumulative PnL curve
/// in date order of the given records.
pub fn compute_summary(records: &[TradeRecord]) -> Summary {
    let trades = records.len() as u32;
    if trades == 0 {
        return Summary {
            trades: 0,
            wins: 0,
            losses: 0,
            win_rate: 0.0,
            total_pnl: 0.0,
            gross_profit: 0.0,
            gross_loss: 0.0,
            max_drawdown: 0.0,
        };
    }

    let wins = records.iter().filter(|r| r.pnl > 0.0).count() as u32;
    let losses = records.iter().filter(|r| r.pnl < 0.0).count() as u32;
    let total_pnl: f64 = records.iter().map(|r| r.pnl).sum();
    let gross_profit: f64 = records.iter().filter(|r| r.pnl > 0.0).map(|r| r.pnl).sum();
    let gross_loss: f64 = records
        .iter()
        .filter(|r| r.pnl < 0.0)
        .map(|r| r.pnl.abs())
        .sum();

    let mut peak = 0.0f64;
    let mut max_dd = 0.0f64;
    let mut equity = 0.0f64;
    for record in records {
        equity += record.pnl;
        peak = peak.max(equity);
        max_dd = max_dd.max(peak - equity);
    }

    Summary {
        trades,
        wins,
        losses,
        win_rate: wins as f64 / trades as f64 * 100.0,
        total_pnl,
        gross_profit,
        gross_loss,
        max_drawdown: max_dd,
    }
}

/// Print the summary in a console report
pub fn print_summary(summary: &Summary) {
    println!("\n═══════════════════════════════════════════");
    println!("           TRADE LOG SUMMARY               ");
    println!("═══════════════════════════════════════════\n");

    println!("  Trades:        {}", summary.trades);
    println!("  Wins:          {} ({:.2}%)", summary.wins, summary.win_rate);
    println!("  Losses:        {}", summary.losses);
    println!();
    println!("  Total PnL:     {:+.2}", summary.total_pnl);
    println!("  Gross Profit:  {:.2}", summary.gross_profit);
    println!("  Gross Loss:    {:.2}", summary.gross_loss);
    println!("  Max Drawdown:  {:.2}", summary.max_drawdown);
    println!("\n═══════════════════════════════════════════\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Direction;
    use crate::simulate::ExitReason;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn record(day: u32, pnl: f64) -> TradeRecord {
        let entry = Utc.with_ymd_and_hms(2025, 6, day, 16, 0, 0).unwrap();
        TradeRecord {
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            direction: Direction::Long,
            entry_time: entry,
            entry_price: 100.0,
            exit_time: entry,
            exit_price: 100.0 + pnl,
            exit_reason: ExitReason::MarketClose,
            pnl,
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = compute_summary(&[]);
        assert_eq!(summary.trades, 0);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
    }

    #[test]
    fn test_summary_counts_and_pnl() {
        let records = vec![record(2, 2.0), record(3, -1.0), record(4, 0.0), record(5, 3.0)];
        let summary = compute_summary(&records);

        assert_eq!(summary.trades, 4);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.win_rate, 50.0);
        assert_eq!(summary.total_pnl, 4.0);
        assert_eq!(summary.gross_profit, 5.0);
        assert_eq!(summary.gross_loss, 1.0);
    }

    #[test]
    fn test_max_drawdown_from_equity_peak() {
        // Equity: 2, -1, -3, 1 -> peak 2, trough -3, drawdown 5
        let records = vec![record(2, 2.0), record(3, -3.0), record(4, -2.0), record(5, 4.0)];
        let summary = compute_summary(&records);
        assert_eq!(summary.max_drawdown, 5.0);
    }
}
