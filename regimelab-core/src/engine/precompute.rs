//! Indicator precompute — all series are computed once before the bar loop.

use crate::domain::{Bar, RegimeParams};
use crate::indicators::{EfficiencyRatio, Indicator, IndicatorFrame, RollingVolatility};
use crate::strategy::Strategy;

/// Collect the full indicator set for a run: the strategy's own indicators
/// plus the efficiency-ratio and volatility series the regime classifier
/// (and sizing) read.
pub fn collect_indicators(
    strategy: &dyn Strategy,
    regime: &RegimeParams,
) -> Vec<Box<dyn Indicator>> {
    let mut indicators = strategy.indicators();
    indicators.push(Box::new(EfficiencyRatio::new(regime.er_window)));
    indicators.push(Box::new(RollingVolatility::new(regime.vol_window)));
    indicators
}

/// Build the frame for a bar series. Duplicate indicator names are computed
/// once.
pub fn precompute_frame(bars: &[Bar], indicators: &[Box<dyn Indicator>]) -> IndicatorFrame {
    IndicatorFrame::compute(bars, indicators)
}

/// Warmup length: the longest lookback across all indicators in the run.
/// No entries are evaluated before this many bars exist.
pub fn compute_warmup(indicators: &[Box<dyn Indicator>]) -> usize {
    indicators.iter().map(|i| i.lookback()).max().unwrap_or(0)
}
