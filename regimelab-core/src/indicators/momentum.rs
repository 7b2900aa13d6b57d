//! Momentum — fractional price change over a trailing window.
//!
//! momentum[i] = close[i] / close[i-window] - 1. Lookback: window.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Momentum {
    window: usize,
    name: String,
}

impl Momentum {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "momentum window must be >= 1");
        Self {
            window,
            name: format!("mom_{window}"),
        }
    }
}

impl Indicator for Momentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        for i in self.window..n {
            let base = bars[i - self.window].close;
            let curr = bars[i].close;
            if base.is_nan() || curr.is_nan() || base == 0.0 {
                continue;
            }
            result[i] = curr / base - 1.0;
        }

        result
    }
}
