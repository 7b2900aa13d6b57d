//! Performance metrics — pure functions over the trade ledger.
//!
//! Every metric is a pure function: ledger in, scalar out. The capital
//! curve used for drawdown is the trade-level replay of the ledger, and
//! Sharpe is computed from per-trade net returns annualized by
//! `sqrt(periods_per_year)`.

use regimelab_core::domain::Ledger;
use serde::{Deserialize, Serialize};

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_bars_held: f64,
    pub trade_count: usize,
    /// Largest gross return magnitude across trades (outlier-cap check).
    pub max_abs_return: f64,
}

impl PerformanceMetrics {
    /// Compute all metrics from a ledger.
    pub fn compute(ledger: &Ledger, periods_per_year: f64) -> Self {
        let curve = ledger.capital_curve();
        Self {
            total_return: total_return(&curve),
            sharpe: sharpe_ratio(ledger, periods_per_year),
            max_drawdown: max_drawdown(&curve),
            win_rate: win_rate(ledger),
            profit_factor: profit_factor(ledger),
            avg_bars_held: avg_bars_held(ledger),
            trade_count: ledger.len(),
            max_abs_return: max_abs_return(ledger),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.total_return.is_finite()
            && self.sharpe.is_finite()
            && self.max_drawdown.is_finite()
            && self.win_rate.is_finite()
            && self.profit_factor.is_finite()
            && self.avg_bars_held.is_finite()
            && self.max_abs_return.is_finite()
    }
}

/// Caller-side compliance limits evaluated against returned metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstraintLimits {
    /// Minimum trades for the run to count as evidence.
    pub min_trades: usize,
    /// Maximum tolerated drawdown magnitude (e.g. 0.30 = 30%).
    pub max_drawdown: f64,
}

impl Default for ConstraintLimits {
    fn default() -> Self {
        Self {
            min_trades: 0,
            max_drawdown: 1.0,
        }
    }
}

/// Non-fatal constraint violations, surfaced as flags rather than errors.
/// The sweep maps a flagged run to the rejected-trial sentinel score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstraintFlags {
    pub below_trade_floor: bool,
    pub drawdown_exceeded: bool,
}

impl ConstraintFlags {
    pub fn evaluate(metrics: &PerformanceMetrics, limits: &ConstraintLimits) -> Self {
        Self {
            below_trade_floor: metrics.trade_count < limits.min_trades,
            drawdown_exceeded: metrics.max_drawdown.abs() > limits.max_drawdown,
        }
    }

    pub fn is_clean(&self) -> bool {
        !self.below_trade_floor && !self.drawdown_exceeded
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(capital_curve: &[f64]) -> f64 {
    if capital_curve.len() < 2 {
        return 0.0;
    }
    let initial = capital_curve[0];
    let final_cap = *capital_curve.last().unwrap();
    if initial <= 0.0 {
        return 0.0;
    }
    (final_cap - initial) / initial
}

/// Annualized Sharpe ratio from per-trade net returns.
///
/// Sharpe = mean(returns) / std(returns) * sqrt(periods_per_year).
/// Returns 0.0 with fewer than 2 trades or zero variance.
pub fn sharpe_ratio(ledger: &Ledger, periods_per_year: f64) -> f64 {
    let returns: Vec<f64> = ledger.trades().iter().map(|t| t.net_return()).collect();
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(&returns);
    let std = std_dev(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * periods_per_year.sqrt()
}

/// Maximum drawdown as a negative fraction (e.g., -0.15 = 15% drawdown),
/// over the running-peak of the replayed capital curve.
pub fn max_drawdown(capital_curve: &[f64]) -> f64 {
    if capital_curve.len() < 2 {
        return 0.0;
    }
    let mut peak = capital_curve[0];
    let mut max_dd = 0.0_f64;

    for &capital in capital_curve {
        if capital > peak {
            peak = capital;
        }
        if peak > 0.0 {
            let dd = (capital - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Win rate: fraction of trades with positive net PnL.
pub fn win_rate(ledger: &Ledger) -> f64 {
    if ledger.is_empty() {
        return 0.0;
    }
    let winners = ledger.trades().iter().filter(|t| t.is_winner()).count();
    winners as f64 / ledger.len() as f64
}

/// Profit factor: gross profits / gross losses, capped at 100.
pub fn profit_factor(ledger: &Ledger) -> f64 {
    if ledger.is_empty() {
        return 0.0;
    }
    let gross_profit: f64 = ledger
        .trades()
        .iter()
        .filter(|t| t.net_pnl > 0.0)
        .map(|t| t.net_pnl)
        .sum();
    let gross_loss: f64 = ledger
        .trades()
        .iter()
        .filter(|t| t.net_pnl < 0.0)
        .map(|t| t.net_pnl.abs())
        .sum();

    if gross_loss < 1e-10 {
        return if gross_profit > 0.0 { 100.0 } else { 0.0 };
    }
    (gross_profit / gross_loss).min(100.0)
}

/// Mean holding period in bars.
pub fn avg_bars_held(ledger: &Ledger) -> f64 {
    if ledger.is_empty() {
        return 0.0;
    }
    let total: usize = ledger.trades().iter().map(|t| t.bars_held).sum();
    total as f64 / ledger.len() as f64
}

/// Largest gross return magnitude across trades. 0.0 for an empty ledger.
pub fn max_abs_return(ledger: &Ledger) -> f64 {
    ledger
        .trades()
        .iter()
        .map(|t| t.return_frac().abs())
        .fold(0.0, f64::max)
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
