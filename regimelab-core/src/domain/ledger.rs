//! Ledger — append-only trade history with additively updated capital.
//!
//! Capital is updated by adding each trade's signed net PnL, never by
//! re-applying a compounding factor to a stale intermediate value, and
//! finiteness is asserted after every record. The trade-level capital curve
//! is replayed from the ledger for drawdown computation.

use super::trade::Trade;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    trades: Vec<Trade>,
    initial_capital: f64,
    capital: f64,
}

impl Ledger {
    pub fn new(initial_capital: f64) -> Self {
        assert!(
            initial_capital.is_finite() && initial_capital > 0.0,
            "initial capital must be finite and positive, got {initial_capital}"
        );
        Self {
            trades: Vec::new(),
            initial_capital,
            capital: initial_capital,
        }
    }

    /// Append a closed trade and apply its net PnL to capital.
    ///
    /// A non-finite capital after the update is a programming defect, not a
    /// recoverable runtime condition.
    pub fn record(&mut self, trade: Trade) {
        self.capital += trade.net_pnl;
        assert!(
            self.capital.is_finite(),
            "capital became non-finite after trade on {} (net_pnl={})",
            trade.exit_date,
            trade.net_pnl
        );
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Replay the ledger into a capital curve: initial capital followed by
    /// the running capital after each trade, in order.
    pub fn capital_curve(&self) -> Vec<f64> {
        let mut curve = Vec::with_capacity(self.trades.len() + 1);
        let mut capital = self.initial_capital;
        curve.push(capital);
        for trade in &self.trades {
            capital += trade.net_pnl;
            curve.push(capital);
        }
        curve
    }
}
