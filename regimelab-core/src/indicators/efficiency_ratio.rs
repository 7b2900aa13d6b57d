//! Kaufman Efficiency Ratio — net directional movement over total path
//! length.
//!
//! ER[i] = |close[i] - close[i-window]| / Σ |close[j] - close[j-1]| over the
//! window, in [0, 1]. A flat window has zero path length; its ER is defined
//! as 0.0 rather than letting the division produce NaN. Lookback: window.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct EfficiencyRatio {
    window: usize,
    name: String,
}

impl EfficiencyRatio {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "ER window must be >= 1");
        Self {
            window,
            name: format!("er_{window}"),
        }
    }
}

impl Indicator for EfficiencyRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.window + 1 {
            return result;
        }

        for i in self.window..n {
            let start = bars[i - self.window].close;
            let end = bars[i].close;
            if start.is_nan() || end.is_nan() {
                continue;
            }

            let mut path = 0.0;
            let mut tainted = false;
            for j in (i - self.window + 1)..=i {
                let step = bars[j].close - bars[j - 1].close;
                if step.is_nan() {
                    tainted = true;
                    break;
                }
                path += step.abs();
            }
            if tainted {
                continue;
            }

            result[i] = if path == 0.0 {
                0.0
            } else {
                ((end - start).abs() / path).clamp(0.0, 1.0)
            };
        }

        result
    }
}
