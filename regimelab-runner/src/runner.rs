//! Backtest runner — wires together the engine, metrics, and constraint
//! checks.
//!
//! `run_single()` is the pure caller-facing contract: `(bars, params,
//! settings) -> BacktestResult` with a scalar score. Compliance checks
//! (trade floor, drawdown bound) are evaluated here, caller-side, against
//! the returned metrics — never inside the engine loop.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use regimelab_core::domain::{Bar, Ledger, StrategyParams};
use regimelab_core::engine::{run_backtest, EngineConfig};
use regimelab_core::error::DataError;
use regimelab_core::fingerprint::{ledger_fingerprint, params_fingerprint};
use regimelab_core::regime::Regime;

use crate::fitness::{FitnessMetric, REJECTED_SCORE};
use crate::metrics::{ConstraintFlags, ConstraintLimits, PerformanceMetrics};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Settings shared by every run in a sweep or walk-forward session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub initial_capital: f64,
    pub periods_per_year: f64,
    pub fitness: FitnessMetric,
    pub limits: ConstraintLimits,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            periods_per_year: 252.0,
            fitness: FitnessMetric::Sharpe,
            limits: ConstraintLimits::default(),
        }
    }
}

/// Complete result of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub params: StrategyParams,
    pub metrics: PerformanceMetrics,
    pub flags: ConstraintFlags,
    /// Scalar objective: the fitness metric, or the rejected-trial
    /// sentinel when a constraint flag is raised.
    pub score: f64,
    pub ledger: Ledger,
    pub regimes: Vec<Option<Regime>>,
    pub signal_count: usize,
    pub bar_count: usize,
    pub warmup_bars: usize,
    pub ledger_fingerprint: String,
    pub params_fingerprint: String,
}

/// Run one backtest and derive metrics, flags, and the scalar score.
pub fn run_single(
    bars: &[Bar],
    params: &StrategyParams,
    settings: &RunSettings,
) -> Result<BacktestResult, RunError> {
    let config = EngineConfig::new(settings.initial_capital);
    let run = run_backtest(bars, params, &config)?;

    let metrics = PerformanceMetrics::compute(&run.ledger, settings.periods_per_year);
    debug_assert!(metrics.is_finite(), "metrics must be finite: {metrics:?}");

    let flags = ConstraintFlags::evaluate(&metrics, &settings.limits);
    let score = if flags.is_clean() {
        settings.fitness.extract(&metrics)
    } else {
        REJECTED_SCORE
    };

    let symbol = bars.first().map(|b| b.symbol.clone()).unwrap_or_default();

    Ok(BacktestResult {
        symbol,
        params: params.clone(),
        metrics,
        flags,
        score,
        ledger_fingerprint: ledger_fingerprint(&run.ledger),
        params_fingerprint: params_fingerprint(params),
        ledger: run.ledger,
        regimes: run.regimes,
        signal_count: run.signal_count,
        bar_count: run.bar_count,
        warmup_bars: run.warmup_bars,
    })
}
