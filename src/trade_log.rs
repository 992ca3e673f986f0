//! The durable trade log: a CSV table keyed by date.
//!
//! Historical rows are immutable. The file is only ever opened for reading
//! or in append mode, so a date that has been recorded once is never
//! recomputed, reordered, or rewritten; re-running over an overlapping
//! provider window can only add rows for unseen dates.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::simulate::TradeRecord;

/// Read the full trade log. A missing file is an empty log; any other
/// read or parse failure is fatal so history is never silently clobbered.
pub fn read_log(path: &Path) -> Result<Vec<TradeRecord>> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No trade log at {:?} yet", path);
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open trade log {:?}", path));
        }
    };

    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: TradeRecord =
            row.with_context(|| format!("Malformed row in trade log {:?}", path))?;
        records.push(record);
    }

    Ok(records)
}

/// The set of dates already recorded in the log
pub fn existing_dates(records: &[TradeRecord]) -> BTreeSet<NaiveDate> {
    records.iter().map(|r| r.date).collect()
}

/// Append new records in ascending date order. Prior rows are untouched;
/// the header is written only when the file is created.
pub fn append_records(path: &Path, new_records: &[TradeRecord]) -> Result<()> {
    if new_records.is_empty() {
        return Ok(());
    }

    let is_new = match std::fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat trade log {:?}", path));
        }
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open trade log {:?} for append", path))?;

    let mut sorted: Vec<&TradeRecord> = new_records.iter().collect();
    sorted.sort_by_key(|r| r.date);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    for record in sorted {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to append trade for {}", record.date))?;
    }
    writer.flush().context("Failed to flush trade log")?;

    Ok(())
}
