//! Signal generation — strategies map bar history, indicators, and the
//! current regime to entry/exit intent.
//!
//! Strategies are position-agnostic: they receive bar history, precomputed
//! indicator values, and the bar's regime, never the ledger or position
//! state. The engine decides what an intent means given its own state
//! (EnterLong is only acted on while flat, Exit only while open).

pub mod ensemble;
pub mod mean_reversion;
pub mod trend_following;

pub use ensemble::Ensemble;
pub use mean_reversion::MeanReversion;
pub use trend_following::TrendFollowing;

use crate::domain::{Bar, RegimeParams, SignalParams};
use crate::indicators::{Indicator, IndicatorFrame};
use crate::regime::Regime;
use serde::{Deserialize, Serialize};

/// Directional intent emitted by a strategy for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    EnterLong,
    Exit,
    Hold,
}

/// Trait for signal generators.
///
/// # Architecture invariant
/// `evaluate` receives only bar history, indicator values, and the regime.
/// The implementation must only use data from `bars[0..=bar_index]`; an
/// undefined indicator (NaN) is "no signal", never zero.
pub trait Strategy: Send + Sync {
    /// Human-readable name (e.g., "mean_reversion").
    fn name(&self) -> &str;

    /// Bars needed before this strategy can produce output.
    fn warmup_bars(&self) -> usize;

    /// Indicators this strategy reads; precomputed by the engine.
    fn indicators(&self) -> Vec<Box<dyn Indicator>>;

    /// Evaluate the strategy at `bar_index`.
    fn evaluate(
        &self,
        bars: &[Bar],
        bar_index: usize,
        frame: &IndicatorFrame,
        regime: Option<Regime>,
    ) -> Signal;
}

/// Build the strategy tree from validated signal parameters.
///
/// The regime parameters supply the shared volatility window used by the
/// mean-reversion volatility floor.
pub fn build_strategy(signal: &SignalParams, regime: &RegimeParams) -> Box<dyn Strategy> {
    match signal {
        SignalParams::MeanReversion(p) => {
            Box::new(MeanReversion::new(p.clone(), regime.vol_window))
        }
        SignalParams::TrendFollowing(p) => Box::new(TrendFollowing::new(p.clone())),
        SignalParams::Ensemble { members, quorum } => {
            let inner = members
                .iter()
                .map(|m| build_strategy(m, regime))
                .collect::<Vec<_>>();
            Box::new(Ensemble::new(inner, *quorum))
        }
    }
}
