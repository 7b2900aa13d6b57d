//! Causal indicator library.
//!
//! Indicators are pure functions: bar history in, numeric series out. They
//! are precomputed once before the bar loop and queried per bar through the
//! `IndicatorFrame`. `f64::NAN` marks warm-up / undefined values; every
//! consumer treats NaN as "no signal", never as zero.
//!
//! # Look-ahead contamination guard
//! No indicator value at bar t may depend on price data from bar t+1 or
//! later. Every indicator must pass the truncated-vs-full series test.

pub mod efficiency_ratio;
pub mod ema;
pub mod momentum;
pub mod rsi;
pub mod volatility;

pub use efficiency_ratio::EfficiencyRatio;
pub use ema::Ema;
pub use momentum::Momentum;
pub use rsi::Rsi;
pub use volatility::RollingVolatility;

use crate::domain::Bar;
use std::collections::HashMap;

/// Trait for indicators.
///
/// `compute` returns a series of the same length as `bars`; the first
/// `lookback()` values are `f64::NAN`.
pub trait Indicator: Send + Sync {
    /// Series key (e.g., "rsi_14", "vol_10").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Precomputed indicator series aligned to the bar sequence.
///
/// Built once before the bar loop, then queried by bar index during the
/// loop. Missing series and out-of-range indices read as `None`.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Precompute a set of indicators over a bar series. An indicator
    /// already present under the same name is not recomputed.
    pub fn compute(bars: &[Bar], indicators: &[Box<dyn Indicator>]) -> Self {
        let mut frame = Self::new();
        for indicator in indicators {
            if !frame.series.contains_key(indicator.name()) {
                frame.insert(indicator.name().to_string(), indicator.compute(bars));
            }
        }
        frame
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Value at a bar index; NaN (warm-up) is returned as-is.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series.get(name).and_then(|v| v.get(bar_index).copied())
    }

    /// Value at a bar index, collapsing missing series, out-of-range
    /// indices, and warm-up NaN into "undefined".
    pub fn defined(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.get(name, bar_index).filter(|v| !v.is_nan())
    }

    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Create synthetic bars from close prices for testing.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            symbol: "TEST".to_string(),
            date: base_date + chrono::Duration::days(i as i64),
            close,
            volume: 1000,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
