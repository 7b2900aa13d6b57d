//! Parameter sweep — grid search over strategy parameters with per-trial
//! fault isolation.
//!
//! Each trial is a pure function of `(bars, params)`, so trials dispatch
//! over rayon with no shared state. A failed or constraint-flagged trial
//! carries the rejected-trial sentinel score; one bad trial never aborts
//! the sweep.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use regimelab_core::domain::{
    Bar, MeanReversionParams, SignalParams, StrategyParams,
};

use crate::fitness::REJECTED_SCORE;
use crate::runner::{run_single, BacktestResult, RunSettings};

/// Grid specification for the mean-reversion parameter family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub rsi_periods: Vec<usize>,
    pub entry_thresholds: Vec<f64>,
    pub exit_thresholds: Vec<f64>,
    pub boosts: Vec<f64>,
}

impl ParamGrid {
    /// A compact default grid around the usual oversold/overbought bands.
    pub fn mean_reversion_default() -> Self {
        Self {
            rsi_periods: vec![2, 7, 14],
            entry_thresholds: vec![25.0, 30.0, 35.0],
            exit_thresholds: vec![65.0, 70.0, 75.0],
            boosts: vec![0.0],
        }
    }

    /// Upper bound on grid size (invalid combinations are skipped during
    /// generation).
    pub fn size(&self) -> usize {
        self.rsi_periods.len()
            * self.entry_thresholds.len()
            * self.exit_thresholds.len()
            * self.boosts.len()
    }

    /// Generate all valid parameter sets, inheriting the regime/risk
    /// sections (and the volatility floor) from `base`.
    pub fn generate(&self, base: &StrategyParams) -> Vec<StrategyParams> {
        let vol_floor = match &base.signal {
            SignalParams::MeanReversion(p) => p.vol_floor,
            _ => 0.0,
        };

        let mut params = Vec::with_capacity(self.size());
        for &rsi_period in &self.rsi_periods {
            for &entry_threshold in &self.entry_thresholds {
                for &exit_threshold in &self.exit_thresholds {
                    for &boost in &self.boosts {
                        let candidate = StrategyParams::new(
                            SignalParams::MeanReversion(MeanReversionParams {
                                rsi_period,
                                entry_threshold,
                                exit_threshold,
                                boost,
                                vol_floor,
                            }),
                            base.regime.clone(),
                            base.risk.clone(),
                        );
                        // Invalid combinations (entry >= exit) are skipped.
                        if let Ok(candidate) = candidate {
                            params.push(candidate);
                        }
                    }
                }
            }
        }
        params
    }
}

/// One trial of a sweep: the parameters, the score, and either a result or
/// the error that rejected it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub params: StrategyParams,
    pub score: f64,
    pub result: Option<BacktestResult>,
    pub error: Option<String>,
}

/// All trial outcomes, in grid order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub trials: Vec<TrialOutcome>,
}

impl SweepOutcome {
    /// Best non-rejected trial, or None when every trial was rejected.
    pub fn best(&self) -> Option<&TrialOutcome> {
        self.trials
            .iter()
            .filter(|t| t.score > REJECTED_SCORE)
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }

    pub fn rejected_count(&self) -> usize {
        self.trials.iter().filter(|t| t.score <= REJECTED_SCORE).count()
    }
}

/// Sweep executor. Parallel by default; trial order in the outcome always
/// matches grid order regardless of scheduling.
#[derive(Debug, Clone)]
pub struct ParamSweep {
    parallel: bool,
}

impl Default for ParamSweep {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl ParamSweep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every grid point against the bar series.
    pub fn sweep(
        &self,
        bars: &[Bar],
        grid: &ParamGrid,
        base: &StrategyParams,
        settings: &RunSettings,
    ) -> SweepOutcome {
        let candidates = grid.generate(base);

        let run_trial = |params: &StrategyParams| -> TrialOutcome {
            match run_single(bars, params, settings) {
                Ok(result) => TrialOutcome {
                    params: params.clone(),
                    score: result.score,
                    result: Some(result),
                    error: None,
                },
                Err(err) => TrialOutcome {
                    params: params.clone(),
                    score: REJECTED_SCORE,
                    result: None,
                    error: Some(err.to_string()),
                },
            }
        };

        let trials = if self.parallel {
            candidates.par_iter().map(run_trial).collect()
        } else {
            candidates.iter().map(run_trial).collect()
        };

        SweepOutcome { trials }
    }
}
