//! Trend-following strategy — fast/slow EMA gap with a momentum floor.
//!
//! ENTER when the fast EMA exceeds the slow EMA by more than a relative
//! threshold and momentum clears its floor. EXIT on crossover reversal
//! (fast below slow) or momentum sign flip. Max-hold exits belong to the
//! risk manager.

use super::{Signal, Strategy};
use crate::domain::{Bar, TrendFollowingParams};
use crate::indicators::{Ema, Indicator, IndicatorFrame, Momentum};
use crate::regime::Regime;

#[derive(Debug, Clone)]
pub struct TrendFollowing {
    params: TrendFollowingParams,
    fast_key: String,
    slow_key: String,
    mom_key: String,
}

impl TrendFollowing {
    pub fn new(params: TrendFollowingParams) -> Self {
        let fast_key = format!("ema_{}", params.fast_period);
        let slow_key = format!("ema_{}", params.slow_period);
        let mom_key = format!("mom_{}", params.momentum_window);
        Self {
            params,
            fast_key,
            slow_key,
            mom_key,
        }
    }
}

impl Strategy for TrendFollowing {
    fn name(&self) -> &str {
        "trend_following"
    }

    fn warmup_bars(&self) -> usize {
        (self.params.slow_period - 1).max(self.params.momentum_window)
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Ema::new(self.params.fast_period)),
            Box::new(Ema::new(self.params.slow_period)),
            Box::new(Momentum::new(self.params.momentum_window)),
        ]
    }

    fn evaluate(
        &self,
        _bars: &[Bar],
        bar_index: usize,
        frame: &IndicatorFrame,
        _regime: Option<Regime>,
    ) -> Signal {
        let fast = match frame.defined(&self.fast_key, bar_index) {
            Some(v) => v,
            None => return Signal::Hold,
        };
        let slow = match frame.defined(&self.slow_key, bar_index) {
            Some(v) if v > 0.0 => v,
            _ => return Signal::Hold,
        };
        let momentum = match frame.defined(&self.mom_key, bar_index) {
            Some(v) => v,
            None => return Signal::Hold,
        };

        if fast < slow || momentum < 0.0 {
            return Signal::Exit;
        }

        let gap = (fast - slow) / slow;
        if gap > self.params.trend_threshold && momentum > self.params.momentum_floor {
            return Signal::EnterLong;
        }

        Signal::Hold
    }
}
