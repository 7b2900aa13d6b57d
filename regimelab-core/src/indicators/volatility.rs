//! Rolling volatility — sample standard deviation of log returns over a
//! trailing window.
//!
//! Value at bar i uses the `window` log returns ending at i, so it is
//! undefined until `window` returns exist. Lookback: window.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct RollingVolatility {
    window: usize,
    name: String,
}

impl RollingVolatility {
    pub fn new(window: usize) -> Self {
        assert!(window >= 2, "volatility window must be >= 2");
        Self {
            window,
            name: format!("vol_{window}"),
        }
    }
}

impl Indicator for RollingVolatility {
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

        let mut log_returns = vec![f64::NAN; n];
        for i in 1..n {
            let curr = bars[i].close;
            let prev = bars[i - 1].close;
            if curr.is_nan() || prev.is_nan() || prev <= 0.0 || curr <= 0.0 {
                log_returns[i] = f64::NAN;
            } else {
                log_returns[i] = (curr / prev).ln();
            }
        }

        for i in self.window..n {
            let sample = &log_returns[i + 1 - self.window..=i];
            if sample.iter().any(|r| r.is_nan()) {
                continue;
            }
            result[i] = sample_std_dev(sample);
        }

        result
    }
}

/// Sample standard deviation (n-1 denominator).
fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}
