//! CSV bar loading — the thin seam to the external data loader.
//!
//! Expected schema (with header): `date,close,volume`, dates as
//! YYYY-MM-DD. The loader only parses; ordering and finiteness are
//! enforced by the engine's own validation before the loop.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use chrono::NaiveDate;
use regimelab_core::domain::Bar;

/// Errors from bar loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("no bars in {path}")]
    Empty { path: String },
}

#[derive(Debug, Deserialize)]
struct BarRow {
    date: NaiveDate,
    close: f64,
    #[serde(default)]
    volume: u64,
}

/// Load one symbol's bars from a CSV file.
pub fn load_bars_csv(path: impl AsRef<Path>, symbol: &str) -> Result<Vec<Bar>, LoadError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let row: BarRow = row?;
        bars.push(Bar::new(symbol, row.date, row.close, row.volume));
    }

    if bars.is_empty() {
        return Err(LoadError::Empty {
            path: path.display().to_string(),
        });
    }
    Ok(bars)
}
