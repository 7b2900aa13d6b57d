//! Ledger export — fixed-schema CSV for the external reporter.
//!
//! One row per trade, in ledger order, with the cumulative capital after
//! each trade replayed from the ledger.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use regimelab_core::domain::Ledger;

/// Errors from ledger export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct TradeRow<'a> {
    symbol: &'a str,
    entry_date: String,
    exit_date: String,
    entry_price: f64,
    exit_price: f64,
    quantity: f64,
    fees: f64,
    net_pnl: f64,
    cumulative_capital: f64,
    exit_reason: String,
}

/// Write the ledger to a CSV file at `path`.
pub fn export_ledger_csv(ledger: &Ledger, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut capital = ledger.initial_capital();
    for trade in ledger.trades() {
        capital += trade.net_pnl;
        writer.serialize(TradeRow {
            symbol: &trade.symbol,
            entry_date: trade.entry_date.to_string(),
            exit_date: trade.exit_date.to_string(),
            entry_price: trade.entry_price,
            exit_price: trade.exit_price,
            quantity: trade.quantity,
            fees: trade.fees,
            net_pnl: trade.net_pnl,
            cumulative_capital: capital,
            exit_reason: trade.exit_reason.to_string(),
        })?;
    }

    writer.flush()?;
    Ok(())
}
