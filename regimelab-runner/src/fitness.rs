//! Fitness function — configurable scalar objective for strategy ranking.
//!
//! Any external optimizer (grid, genetic, Bayesian) drives the engine
//! through this single contract: parameters in, one scalar out. Runs that
//! violate caller-side constraints score the rejected-trial sentinel
//! rather than raising.

use crate::metrics::PerformanceMetrics;
use serde::{Deserialize, Serialize};

/// Score assigned to rejected or failed trials. Orders strictly below any
/// real metric value so a sweep never selects a rejected trial; finite so
/// results containing it still serialize to JSON.
pub const REJECTED_SCORE: f64 = f64::MIN;

/// Which metric to optimize/sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessMetric {
    #[default]
    Sharpe,
    TotalReturn,
    WinRate,
    ProfitFactor,
    MaxDrawdown,
}

impl FitnessMetric {
    /// Extract the relevant metric value from a PerformanceMetrics struct.
    pub fn extract(&self, metrics: &PerformanceMetrics) -> f64 {
        match self {
            Self::Sharpe => metrics.sharpe,
            Self::TotalReturn => metrics.total_return,
            Self::WinRate => metrics.win_rate,
            Self::ProfitFactor => metrics.profit_factor,
            Self::MaxDrawdown => metrics.max_drawdown,
        }
    }

    /// Compare two scores. Returns true if `a` is better than `b`.
    ///
    /// `a > b` is correct for every metric including MaxDrawdown: drawdowns
    /// are negative fractions, and -0.05 > -0.20 means the smaller
    /// drawdown wins.
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        a > b
    }
}
