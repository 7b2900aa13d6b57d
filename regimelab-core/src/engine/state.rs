//! Engine configuration and run result types.

use crate::domain::Ledger;
use crate::regime::Regime;
use serde::{Deserialize, Serialize};

/// Configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_capital: f64,
}

impl EngineConfig {
    pub fn new(initial_capital: f64) -> Self {
        Self { initial_capital }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
        }
    }
}

/// Result of a complete backtest run: the ledger plus per-run diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRun {
    /// Completed trades and the running capital.
    pub ledger: Ledger,
    /// Per-bar regime series (None during classifier warm-up).
    pub regimes: Vec<Option<Regime>>,
    /// Actionable signals emitted during the run: entries while flat,
    /// exits while a position was open.
    pub signal_count: usize,
    /// Total bars processed.
    pub bar_count: usize,
    /// Bars skipped for entries while indicators warmed up.
    pub warmup_bars: usize,
}

impl BacktestRun {
    pub fn final_capital(&self) -> f64 {
        self.ledger.capital()
    }
}
