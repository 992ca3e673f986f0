use anyhow::{Context, Result};
use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use rangefade::bars::group_by_trading_day;
use rangefade::day::{process_day, DayOutcome, SessionConfig};
use rangefade::metrics::{compute_summary, print_summary};
use rangefade::simulate::TradeRecord;
use rangefade::{fetch, trade_log};

#[derive(Parser, Debug)]
#[command(name = "rangefade")]
#[command(about = "Daily morning-range fade backtest for SPX 15-minute bars")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Print verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch bars, backtest the new trading days, append to the trade log
    Run {
        /// Instrument symbol
        #[arg(short, long, default_value = "^SPX")]
        ticker: String,

        /// Lookback period (provider keeps ~60 days of 15m bars)
        #[arg(short, long, default_value = "60d")]
        period: String,

        /// Bar interval
        #[arg(short, long, default_value = "15m")]
        interval: String,

        /// Trade log location
        #[arg(short, long, default_value = "trade_log.csv")]
        output: PathBuf,

        /// Morning reference window start (exchange-local, HH:MM)
        #[arg(long, default_value = "09:30")]
        window_start: String,

        /// Morning reference window end, inclusive (exchange-local, HH:MM)
        #[arg(long, default_value = "11:30")]
        window_end: String,

        /// Minimum bars the morning window must hold
        #[arg(long, default_value = "8")]
        min_window_bars: usize,
    },

    /// Print the performance summary of an existing trade log
    Report {
        /// Trade log location
        #[arg(short, long, default_value = "trade_log.csv")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Commands::Run {
            ticker,
            period,
            interval,
            output,
            window_start,
            window_end,
            min_window_bars,
        } => {
            let config = SessionConfig {
                window_start: parse_clock_time(&window_start)?,
                window_end: parse_clock_time(&window_end)?,
                min_window_bars,
            };
            run_backtest(&ticker, &period, &interval, &output, &config).await?;
        }
        Commands::Report { output } => {
            run_report(&output)?;
        }
    }

    Ok(())
}

fn parse_clock_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .with_context(|| format!("Invalid clock time {:?}, expected HH:MM", value))
}

async fn run_backtest(
    ticker: &str,
    period: &str,
    interval: &str,
    output: &PathBuf,
    config: &SessionConfig,
) -> Result<()> {
    info!("=== BACKTEST RUN ===");
    info!("Trade log: {:?}", output);

    // Read the log first: a broken log must abort before anything else runs
    let existing = trade_log::read_log(output)?;
    let recorded_dates = trade_log::existing_dates(&existing);
    info!("{} dates already recorded", recorded_dates.len());

    let bars = fetch::fetch_bars(ticker, period, interval).await?;
    let days = group_by_trading_day(&bars);
    info!("Fetched window covers {} trading days", days.len());

    let mut new_records: Vec<TradeRecord> = Vec::new();
    let mut skipped = 0usize;

    for (date, day_bars) in &days {
        if recorded_dates.contains(date) {
            skipped += 1;
            continue;
        }

        match process_day(*date, day_bars, config) {
            DayOutcome::Trade(record) => {
                info!(
                    "{}: {} entry {:.2} exit {:.2} ({}) pnl {:+.2}",
                    date,
                    record.direction,
                    record.entry_price,
                    record.exit_price,
                    record.exit_reason,
                    record.pnl
                );
                new_records.push(record);
            }
            DayOutcome::MalformedBar => warn!("{}: malformed bar, day rejected", date),
            DayOutcome::NoWindow => debug!("{}: morning window incomplete, day skipped", date),
            DayOutcome::NoSignal => debug!("{}: no confirmed signal", date),
            DayOutcome::NoEntryBar => debug!("{}: confirmation at day end, no entry", date),
        }
    }

    info!(
        "{} new trades, {} days already recorded",
        new_records.len(),
        skipped
    );

    trade_log::append_records(output, &new_records)?;
    if !new_records.is_empty() {
        info!("Appended {} trades to {:?}", new_records.len(), output);
    }

    let mut all_records = existing;
    all_records.extend(new_records);
    all_records.sort_by_key(|r| r.date);
    print_summary(&compute_summary(&all_records));

    Ok(())
}

fn run_report(output: &PathBuf) -> Result<()> {
    info!("=== TRADE LOG REPORT ===");

    let records = trade_log::read_log(output)?;
    if records.is_empty() {
        info!("No trades recorded yet in {:?}", output);
        return Ok(());
    }

    print_summary(&compute_summary(&records));

    println!("Recent trades:");
    for record in records.iter().rev().take(10).rev() {
        println!(
            "  {}  {:5}  entry {:8.2}  exit {:8.2}  {:17}  {:+.2}",
            record.date,
            record.direction.to_string(),
            record.entry_price,
            record.exit_price,
            record.exit_reason.to_string(),
            record.pnl
        );
    }
    println!();

    Ok(())
}
