//! Strategy parameters — one immutable, validated struct per engine
//! invocation.
//!
//! Parameters are checked once at construction and never mutated afterward.
//! There is no module-level or process-wide configuration: every engine run
//! receives its own `StrategyParams` value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parameter validation.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{name} must be >= 1, got {value}")]
    PeriodTooShort { name: &'static str, value: usize },
    #[error("entry threshold {entry} must be below exit threshold {exit}")]
    ThresholdOrder { entry: f64, exit: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("{name} must be in ({min}, {max}], got {value}")]
    FractionOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{name} must be >= 0, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("fast period {fast} must be below slow period {slow}")]
    EmaOrder { fast: usize, slow: usize },
    #[error("efficiency-ratio cuts must satisfy 0 <= low < high, got low={low} high={high}")]
    RegimeCutOrder { low: f64, high: f64 },
    #[error("ensemble must have at least one member")]
    EmptyEnsemble,
    #[error("ensemble quorum {quorum} must be in 1..={members}")]
    QuorumOutOfRange { quorum: usize, members: usize },
    #[error("ensemble members must all be the same non-ensemble variant")]
    MixedEnsemble,
    #[error("vol_window must be >= 2 (a single return has no deviation), got {0}")]
    VolWindowTooShort(usize),
    #[error("adaptive hold bounds must satisfy 1 <= min <= max, got min={min} max={max}")]
    HoldBounds { min: usize, max: usize },
    #[error("return cap must be positive and finite, got {0}")]
    BadReturnCap(f64),
}

/// Transaction-cost model applied when a trade closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeeModel {
    /// Flat fee charged once per round trip.
    PerRoundTrip { fee: f64 },
    /// Rate applied to entry and exit notional.
    PercentNotional { rate: f64 },
}

impl FeeModel {
    fn validate(&self) -> Result<(), ParamError> {
        match *self {
            FeeModel::PerRoundTrip { fee } => {
                if !fee.is_finite() {
                    return Err(ParamError::NonFinite { name: "fee", value: fee });
                }
                if fee < 0.0 {
                    return Err(ParamError::Negative { name: "fee", value: fee });
                }
            }
            FeeModel::PercentNotional { rate } => {
                if !rate.is_finite() {
                    return Err(ParamError::NonFinite { name: "fee rate", value: rate });
                }
                if rate < 0.0 {
                    return Err(ParamError::Negative { name: "fee rate", value: rate });
                }
            }
        }
        Ok(())
    }
}

/// Mean-reversion signal parameters.
///
/// `boost` is an additive calibration offset shifting the effective RSI
/// thresholds without altering the comparison operators. Default 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanReversionParams {
    pub rsi_period: usize,
    pub entry_threshold: f64,
    pub exit_threshold: f64,
    #[serde(default)]
    pub boost: f64,
    /// Minimum rolling volatility for entries.
    #[serde(default)]
    pub vol_floor: f64,
}

impl MeanReversionParams {
    fn validate(&self) -> Result<(), ParamError> {
        if self.rsi_period < 1 {
            return Err(ParamError::PeriodTooShort {
                name: "rsi_period",
                value: self.rsi_period,
            });
        }
        for (name, value) in [
            ("entry_threshold", self.entry_threshold),
            ("exit_threshold", self.exit_threshold),
            ("boost", self.boost),
            ("vol_floor", self.vol_floor),
        ] {
            if !value.is_finite() {
                return Err(ParamError::NonFinite { name, value });
            }
        }
        if self.entry_threshold >= self.exit_threshold {
            return Err(ParamError::ThresholdOrder {
                entry: self.entry_threshold,
                exit: self.exit_threshold,
            });
        }
        if self.vol_floor < 0.0 {
            return Err(ParamError::Negative {
                name: "vol_floor",
                value: self.vol_floor,
            });
        }
        Ok(())
    }
}

/// Trend-following signal parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendFollowingParams {
    pub fast_period: usize,
    pub slow_period: usize,
    /// Minimum relative EMA gap, (fast - slow) / slow, for entries.
    pub trend_threshold: f64,
    pub momentum_window: usize,
    pub momentum_floor: f64,
}

impl TrendFollowingParams {
    fn validate(&self) -> Result<(), ParamError> {
        if self.fast_period < 1 {
            return Err(ParamError::PeriodTooShort {
                name: "fast_period",
                value: self.fast_period,
            });
        }
        if self.momentum_window < 1 {
            return Err(ParamError::PeriodTooShort {
                name: "momentum_window",
                value: self.momentum_window,
            });
        }
        if self.fast_period >= self.slow_period {
            return Err(ParamError::EmaOrder {
                fast: self.fast_period,
                slow: self.slow_period,
            });
        }
        for (name, value) in [
            ("trend_threshold", self.trend_threshold),
            ("momentum_floor", self.momentum_floor),
        ] {
            if !value.is_finite() {
                return Err(ParamError::NonFinite { name, value });
            }
        }
        if self.trend_threshold < 0.0 {
            return Err(ParamError::Negative {
                name: "trend_threshold",
                value: self.trend_threshold,
            });
        }
        Ok(())
    }
}

/// Tagged signal-generator variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum SignalParams {
    MeanReversion(MeanReversionParams),
    TrendFollowing(TrendFollowingParams),
    /// Quorum vote over N parameter variants of one inner strategy type.
    Ensemble {
        members: Vec<SignalParams>,
        quorum: usize,
    },
}

impl SignalParams {
    fn validate(&self) -> Result<(), ParamError> {
        match self {
            SignalParams::MeanReversion(p) => p.validate(),
            SignalParams::TrendFollowing(p) => p.validate(),
            SignalParams::Ensemble { members, quorum } => {
                if members.is_empty() {
                    return Err(ParamError::EmptyEnsemble);
                }
                if *quorum < 1 || *quorum > members.len() {
                    return Err(ParamError::QuorumOutOfRange {
                        quorum: *quorum,
                        members: members.len(),
                    });
                }
                let same_variant = members.windows(2).all(|w| {
                    std::mem::discriminant(&w[0]) == std::mem::discriminant(&w[1])
                });
                let nested = members
                    .iter()
                    .any(|m| matches!(m, SignalParams::Ensemble { .. }));
                if !same_variant || nested {
                    return Err(ParamError::MixedEnsemble);
                }
                for member in members {
                    member.validate()?;
                }
                Ok(())
            }
        }
    }
}

/// Regime classifier parameters, configurable per symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeParams {
    pub er_window: usize,
    /// ER strictly below this cut: mean-reverting.
    pub er_low: f64,
    /// ER strictly above this cut: trending.
    pub er_high: f64,
    /// Window for the shared rolling-volatility series.
    pub vol_window: usize,
    /// Minimum-dwell hysteresis: switch only after the new classification
    /// persists this many consecutive bars. 0 disables hysteresis.
    #[serde(default)]
    pub dwell_bars: usize,
}

impl Default for RegimeParams {
    fn default() -> Self {
        Self {
            er_window: 10,
            er_low: 0.3,
            er_high: 0.7,
            vol_window: 10,
            dwell_bars: 0,
        }
    }
}

impl RegimeParams {
    fn validate(&self) -> Result<(), ParamError> {
        if self.er_window < 1 {
            return Err(ParamError::PeriodTooShort {
                name: "er_window",
                value: self.er_window,
            });
        }
        if self.vol_window < 2 {
            return Err(ParamError::VolWindowTooShort(self.vol_window));
        }
        if !self.er_low.is_finite() || !self.er_high.is_finite() {
            return Err(ParamError::RegimeCutOrder {
                low: self.er_low,
                high: self.er_high,
            });
        }
        if self.er_low < 0.0 || self.er_low >= self.er_high {
            return Err(ParamError::RegimeCutOrder {
                low: self.er_low,
                high: self.er_high,
            });
        }
        Ok(())
    }
}

/// Adaptive hold: scale the max holding period inversely with volatility at
/// entry, clamped to [min_hold, max_hold].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveHoldParams {
    pub base_hold: usize,
    pub min_hold: usize,
    pub max_hold: usize,
    pub baseline_vol: f64,
}

impl AdaptiveHoldParams {
    fn validate(&self) -> Result<(), ParamError> {
        if self.base_hold < 1 {
            return Err(ParamError::PeriodTooShort {
                name: "base_hold",
                value: self.base_hold,
            });
        }
        if self.min_hold < 1 || self.min_hold > self.max_hold {
            return Err(ParamError::HoldBounds {
                min: self.min_hold,
                max: self.max_hold,
            });
        }
        if !self.baseline_vol.is_finite() || self.baseline_vol <= 0.0 {
            return Err(ParamError::NonFinite {
                name: "baseline_vol",
                value: self.baseline_vol,
            });
        }
        Ok(())
    }
}

/// Position sizing, cost, and exit-limit parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskParams {
    /// Base fraction of capital per position before volatility scaling.
    pub base_fraction: f64,
    /// Volatility dampening: fraction = base / (1 + vol_scale * volatility).
    #[serde(default)]
    pub vol_scale: f64,
    /// Hard cap on the fraction of capital committed to one position.
    pub max_fraction: f64,
    /// Fixed max-hold in bars; superseded per trade by `adaptive_hold`.
    pub max_hold_bars: usize,
    #[serde(default)]
    pub adaptive_hold: Option<AdaptiveHoldParams>,
    /// Ceiling on any single trade's gross return magnitude.
    pub return_cap: f64,
    pub fee_model: FeeModel,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            base_fraction: 0.25,
            vol_scale: 0.0,
            max_fraction: 0.25,
            max_hold_bars: 20,
            adaptive_hold: None,
            return_cap: 0.5,
            fee_model: FeeModel::PercentNotional { rate: 0.001 },
        }
    }
}

impl RiskParams {
    fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in [
            ("base_fraction", self.base_fraction),
            ("max_fraction", self.max_fraction),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(ParamError::FractionOutOfRange {
                    name,
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }
        if !self.vol_scale.is_finite() {
            return Err(ParamError::NonFinite {
                name: "vol_scale",
                value: self.vol_scale,
            });
        }
        if self.vol_scale < 0.0 {
            return Err(ParamError::Negative {
                name: "vol_scale",
                value: self.vol_scale,
            });
        }
        if self.max_hold_bars < 1 {
            return Err(ParamError::PeriodTooShort {
                name: "max_hold_bars",
                value: self.max_hold_bars,
            });
        }
        if !self.return_cap.is_finite() || self.return_cap <= 0.0 {
            return Err(ParamError::BadReturnCap(self.return_cap));
        }
        if let Some(adaptive) = &self.adaptive_hold {
            adaptive.validate()?;
        }
        self.fee_model.validate()
    }
}

/// The complete, validated parameter set for one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    pub signal: SignalParams,
    pub regime: RegimeParams,
    pub risk: RiskParams,
}

impl StrategyParams {
    /// Validate and freeze a parameter set.
    pub fn new(
        signal: SignalParams,
        regime: RegimeParams,
        risk: RiskParams,
    ) -> Result<Self, ParamError> {
        signal.validate()?;
        regime.validate()?;
        risk.validate()?;
        Ok(Self { signal, regime, risk })
    }

    /// Re-validate a deserialized parameter set.
    pub fn validated(self) -> Result<Self, ParamError> {
        Self::new(self.signal, self.regime, self.risk)
    }
}
