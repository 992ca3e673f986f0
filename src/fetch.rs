//! Fetch historical intraday bars from the Yahoo Finance chart API.
//!
//! The provider keeps roughly 60 days of 15-minute history, so the fetched
//! window slides forward over time; the trade log, not the provider, is the
//! durable record.

use anyhow::{bail, Context, Result};
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, info};

use crate::bars::Bar;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo rejects requests without a browser-style user agent
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:131.0) Gecko/20100101 Firefox/131.0";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

/// Parallel arrays keyed by the timestamp index; halted or partial buckets
/// come through as nulls
#[derive(Debug, Deserialize)]
struct Quote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
}

/// Fetch ordered OHLC bars for `(ticker, period, interval)`.
pub async fn fetch_bars(ticker: &str, period: &str, interval: &str) -> Result<Vec<Bar>> {
    info!("Fetching {} {} bars over {}", ticker, interval, period);

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")?;

    let url = format!("{}/{}", CHART_URL, ticker);
    let response = client
        .get(&url)
        .query(&[
            ("range", period),
            ("interval", interval),
            ("includePrePost", "false"),
        ])
        .send()
        .await
        .with_context(|| format!("Failed to fetch chart data for {}", ticker))?
        .error_for_status()
        .with_context(|| format!("Provider rejected chart request for {}", ticker))?;

    let payload: ChartResponse = response
        .json()
        .await
        .context("Failed to parse chart response")?;

    let bars = bars_from_payload(payload)?;
    info!("Fetched {} bars", bars.len());
    Ok(bars)
}

fn bars_from_payload(payload: ChartResponse) -> Result<Vec<Bar>> {
    if let Some(err) = payload.chart.error {
        bail!("Provider error {}: {}", err.code, err.description);
    }

    let result = payload
        .chart
        .result
        .and_then(|mut results| {
            if results.is_empty() {
                None
            } else {
                Some(results.remove(0))
            }
        })
        .context("Provider returned no chart data")?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .context("Provider returned no quote data")?;

    let mut bars = Vec::with_capacity(result.timestamp.len());
    let mut dropped = 0usize;

    for (i, &ts) in result.timestamp.iter().enumerate() {
        let ohlc = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = ohlc else {
            dropped += 1;
            continue;
        };

        let timestamp = DateTime::from_timestamp(ts, 0)
            .with_context(|| format!("Invalid bar timestamp {}", ts))?;

        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
        });
    }

    if dropped > 0 {
        debug!("Dropped {} incomplete buckets", dropped);
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}
