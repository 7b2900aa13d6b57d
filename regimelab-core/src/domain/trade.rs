//! Trade — a completed round-trip, immutable once recorded.

use super::position::PositionSide;
use crate::risk::ExitReason;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A complete round-trip trade record: entry → exit.
///
/// `gross_pnl` is price PnL before fees; `net_pnl` is the signed cash delta
/// applied to capital. `return_frac()` is the gross price return — the
/// quantity the outlier cap bounds, independent of the fee model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub side: PositionSide,

    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,

    pub exit_bar: usize,
    pub exit_date: NaiveDate,
    pub exit_price: f64,

    pub quantity: f64,
    pub fees: f64,
    pub gross_pnl: f64,
    pub net_pnl: f64,

    pub bars_held: usize,
    pub exit_reason: ExitReason,
}

impl Trade {
    /// Gross price return as a fraction of entry.
    pub fn return_frac(&self) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        (self.exit_price - self.entry_price) / self.entry_price
    }

    /// Net return on the capital committed at entry.
    pub fn net_return(&self) -> f64 {
        let notional = self.entry_price * self.quantity;
        if notional == 0.0 {
            return 0.0;
        }
        self.net_pnl / notional
    }

    pub fn is_winner(&self) -> bool {
        self.net_pnl > 0.0
    }
}
