//! CSV bar loading for local runs.
//!
//! Expected header: `date,open,high,low,close,volume` (dates as `YYYY-MM-DD`).
//! Rows are sorted ascending by date; a repeated date keeps the row that
//! appears last in the file. Rows failing the OHLC sanity check are dropped
//! with a warning.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use trendscan_core::domain::{Bar, Fundamentals};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: row {row}: invalid date '{value}' (expected YYYY-MM-DD)")]
    BadDate {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("{path} contains no usable bars")]
    Empty { path: PathBuf },

    #[error("failed to read fundamentals from {path}: {reason}")]
    Fundamentals { path: PathBuf, reason: String },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Load a bar file from disk.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    read_bars(reader, path)
}

fn read_bars<R: Read>(mut reader: csv::Reader<R>, path: &Path) -> Result<Vec<Bar>, LoadError> {
    let mut bars = Vec::new();
    let mut dropped = 0usize;

    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let row = row.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|_| {
            LoadError::BadDate {
                path: path.to_path_buf(),
                row: line,
                value: row.date.clone(),
            }
        })?;
        if !row.volume.is_finite() || row.volume < 0.0 {
            warn!(path = %path.display(), line, volume = row.volume, "dropping row with bad volume");
            dropped += 1;
            continue;
        }
        let bar = Bar {
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.round() as u64,
        };
        if !bar.is_sane() {
            warn!(path = %path.display(), line, %date, "dropping bar failing OHLC sanity check");
            dropped += 1;
            continue;
        }
        bars.push(bar);
    }

    // Stable sort keeps file order within a date, so the last row wins below.
    bars.sort_by_key(|b| b.date);
    let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            _ => deduped.push(bar),
        }
    }

    if deduped.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), bars = deduped.len(), dropped, "bars loaded");
    Ok(deduped)
}

/// Load a fundamentals snapshot from a JSON file. Missing keys are absent fields.
pub fn load_fundamentals(path: &Path) -> Result<Fundamentals, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Fundamentals {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| LoadError::Fundamentals {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Symbol implied by a file name: `data/aapl.csv` → `AAPL`.
pub fn symbol_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map_or_else(|| "UNKNOWN".to_string(), str::to_uppercase)
}
