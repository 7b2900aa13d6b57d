//! Position — the single live holding for a symbol, and the engine's
//! position state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a position. The engine currently trades long-only entries;
/// the side is carried on every trade record for downstream reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
}

/// A live position, created at a fill and destroyed on exit.
///
/// Mutated only by bar-count increments between fill and exit. The hold
/// limit is resolved once at entry (adaptive hold scales it by volatility)
/// and frozen here so exit logic stays deterministic mid-trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: PositionSide,
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub quantity: f64,
    /// Bars elapsed since the fill bar.
    pub bars_held: usize,
    /// Effective max-hold for this trade, resolved at entry.
    pub max_hold_bars: usize,
}

impl Position {
    /// Gross unrealized return at `price`, as a fraction of entry.
    pub fn unrealized_return(&self, price: f64) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        (price - self.entry_price) / self.entry_price
    }
}

/// Engine-owned position state: at most one live position per run.
///
/// Opening while a position is live is unrepresentable — the only path to
/// `Open` is the `Flat` match arm in the bar loop.
#[derive(Debug, Clone, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Open(Position),
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Flat)
    }
}
