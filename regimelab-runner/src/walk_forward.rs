//! Walk-forward validation — contiguous Train/Validation/Test partitioning
//! with fit-on-train parameter freezing.
//!
//! The bar series is split by fixed fractions (default 60/20/20). The grid
//! is swept on the Train range only; the winning parameter set is frozen
//! and applied unchanged to Validation and Test. No parameter visibility
//! crosses a boundary — the report carries the chosen params' fingerprint
//! so callers can assert structural identity across segments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use regimelab_core::domain::{Bar, StrategyParams};
use regimelab_core::fingerprint::params_fingerprint;

use crate::metrics::PerformanceMetrics;
use crate::runner::{run_single, RunError, RunSettings};
use crate::sweep::{ParamGrid, ParamSweep};

// ─── Configuration ───────────────────────────────────────────────────

/// Split fractions for walk-forward partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitFractions {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

impl Default for SplitFractions {
    fn default() -> Self {
        Self {
            train: 0.6,
            validation: 0.2,
            test: 0.2,
        }
    }
}

/// Configuration for a walk-forward session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    pub fractions: SplitFractions,
    /// Minimum bars each segment must hold.
    pub min_segment_bars: usize,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            fractions: SplitFractions::default(),
            min_segment_bars: 20,
        }
    }
}

// ─── Result types ────────────────────────────────────────────────────

/// Bar-index ranges of the three contiguous segments:
/// Train = [0, train_end), Validation = [train_end, validation_end),
/// Test = [validation_end, n_bars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSpec {
    pub train_end: usize,
    pub validation_end: usize,
    pub n_bars: usize,
}

impl SplitSpec {
    pub fn train_len(&self) -> usize {
        self.train_end
    }

    pub fn validation_len(&self) -> usize {
        self.validation_end - self.train_end
    }

    pub fn test_len(&self) -> usize {
        self.n_bars - self.validation_end
    }
}

/// Metrics for one segment evaluated under the frozen parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    pub metrics: PerformanceMetrics,
    pub score: f64,
    /// Fingerprint of the params this segment ran with.
    pub params_fingerprint: String,
}

/// Complete result of a walk-forward session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardReport {
    pub split: SplitSpec,
    /// Parameters fit on Train and frozen before later segments.
    pub chosen: StrategyParams,
    pub train: SegmentResult,
    pub validation: SegmentResult,
    pub test: SegmentResult,
}

/// Errors from walk-forward validation.
#[derive(Debug, Error)]
pub enum WalkForwardError {
    #[error("fractions must be positive and sum to 1, got {train}/{validation}/{test}")]
    BadFractions {
        train: f64,
        validation: f64,
        test: f64,
    },
    #[error("insufficient data: segment '{segment}' has {bars} bars < minimum {min_bars}")]
    InsufficientData {
        segment: &'static str,
        bars: usize,
        min_bars: usize,
    },
    #[error("no parameter set survived the train sweep")]
    NoViableParams,
    #[error("backtest error on {segment}: {source}")]
    BacktestFailed {
        segment: &'static str,
        #[source]
        source: RunError,
    },
}

// ─── Split creation ──────────────────────────────────────────────────

/// Partition `n_bars` into contiguous Train/Validation/Test ranges.
pub fn split_by_fractions(
    n_bars: usize,
    config: &WalkForwardConfig,
) -> Result<SplitSpec, WalkForwardError> {
    let f = config.fractions;
    let sum = f.train + f.validation + f.test;
    if f.train <= 0.0 || f.validation <= 0.0 || f.test <= 0.0 || (sum - 1.0).abs() > 1e-9 {
        return Err(WalkForwardError::BadFractions {
            train: f.train,
            validation: f.validation,
            test: f.test,
        });
    }

    let train_end = (n_bars as f64 * f.train).floor() as usize;
    let validation_end = (n_bars as f64 * (f.train + f.validation)).floor() as usize;
    let split = SplitSpec {
        train_end,
        validation_end,
        n_bars,
    };

    for (segment, bars) in [
        ("train", split.train_len()),
        ("validation", split.validation_len()),
        ("test", split.test_len()),
    ] {
        if bars < config.min_segment_bars {
            return Err(WalkForwardError::InsufficientData {
                segment,
                bars,
                min_bars: config.min_segment_bars,
            });
        }
    }

    Ok(split)
}

// ─── Walk-forward orchestration ──────────────────────────────────────

/// Fit on Train, freeze, evaluate on Validation and Test.
pub fn run_walk_forward(
    bars: &[Bar],
    grid: &ParamGrid,
    base: &StrategyParams,
    settings: &RunSettings,
    config: &WalkForwardConfig,
) -> Result<WalkForwardReport, WalkForwardError> {
    let split = split_by_fractions(bars.len(), config)?;

    let train_bars = &bars[..split.train_end];
    let validation_bars = &bars[split.train_end..split.validation_end];
    let test_bars = &bars[split.validation_end..];

    // Fit: sweep the grid on Train only.
    let outcome = ParamSweep::new().sweep(train_bars, grid, base, settings);
    let chosen = outcome
        .best()
        .ok_or(WalkForwardError::NoViableParams)?
        .params
        .clone();

    // Freeze: the same value is applied unchanged to every segment.
    let evaluate = |segment: &'static str, bars: &[Bar]| -> Result<SegmentResult, WalkForwardError> {
        let result = run_single(bars, &chosen, settings)
            .map_err(|source| WalkForwardError::BacktestFailed { segment, source })?;
        Ok(SegmentResult {
            metrics: result.metrics,
            score: result.score,
            params_fingerprint: params_fingerprint(&chosen),
        })
    };

    let train = evaluate("train", train_bars)?;
    let validation = evaluate("validation", validation_bars)?;
    let test = evaluate("test", test_bars)?;

    Ok(WalkForwardReport {
        split,
        chosen,
        train,
        validation,
        test,
    })
}
