//! Mean-reversion strategy — RSI oversold entries gated by regime and a
//! volatility floor.
//!
//! ENTER when `rsi + boost < entry_threshold`, the regime permits
//! (mean-reverting or transitional), and rolling volatility exceeds the
//! floor. EXIT when `rsi + boost > exit_threshold`. `boost` shifts the
//! effective thresholds without altering the comparison operators.

use super::{Signal, Strategy};
use crate::domain::{Bar, MeanReversionParams};
use crate::indicators::{Indicator, IndicatorFrame, RollingVolatility, Rsi};
use crate::regime::Regime;

#[derive(Debug, Clone)]
pub struct MeanReversion {
    params: MeanReversionParams,
    vol_window: usize,
    rsi_key: String,
    vol_key: String,
}

impl MeanReversion {
    pub fn new(params: MeanReversionParams, vol_window: usize) -> Self {
        let rsi_key = format!("rsi_{}", params.rsi_period);
        let vol_key = format!("vol_{vol_window}");
        Self {
            params,
            vol_window,
            rsi_key,
            vol_key,
        }
    }

    fn regime_permits(regime: Option<Regime>) -> bool {
        matches!(regime, Some(Regime::MeanReverting | Regime::Transitional))
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &str {
        "mean_reversion"
    }

    fn warmup_bars(&self) -> usize {
        self.params.rsi_period.max(self.vol_window)
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Rsi::new(self.params.rsi_period)),
            Box::new(RollingVolatility::new(self.vol_window)),
        ]
    }

    fn evaluate(
        &self,
        _bars: &[Bar],
        bar_index: usize,
        frame: &IndicatorFrame,
        regime: Option<Regime>,
    ) -> Signal {
        let rsi = match frame.defined(&self.rsi_key, bar_index) {
            Some(v) => v,
            None => return Signal::Hold,
        };
        let shifted = rsi + self.params.boost;

        if shifted > self.params.exit_threshold {
            return Signal::Exit;
        }

        if shifted < self.params.entry_threshold {
            let vol_ok = frame
                .defined(&self.vol_key, bar_index)
                .is_some_and(|v| v > self.params.vol_floor);
            if Self::regime_permits(regime) && vol_ok {
                return Signal::EnterLong;
            }
        }

        Signal::Hold
    }
}
