//! Position & risk manager — sizing, transaction costs, and the exit
//! decision chain.
//!
//! Exit conditions are evaluated in strict priority order: outlier cap,
//! strategy exit signal, max-hold, then the engine's end-of-data close.
//! The first matching condition wins and exactly one reason is recorded
//! per trade.

use crate::domain::{Bar, FeeModel, Position, PositionSide, RiskParams, Trade};
use crate::strategy::Signal;
use serde::{Deserialize, Serialize};

/// Why a trade closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Unrealized return magnitude exceeded the configured cap; exit price
    /// clamped to the cap boundary.
    OutlierCap,
    /// The strategy emitted an exit signal.
    Signal,
    /// The (possibly adaptive) max-hold was reached.
    MaxHold,
    /// Forced close at the end of the bar series.
    EndOfData,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExitReason::OutlierCap => "outlier_cap",
            ExitReason::Signal => "signal",
            ExitReason::MaxHold => "max_hold",
            ExitReason::EndOfData => "end_of_data",
        };
        f.write_str(s)
    }
}

/// A resolved exit: the reason and the price the trade closes at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitDecision {
    pub reason: ExitReason,
    pub exit_price: f64,
}

/// Owns position sizing, cost application, and exit-trigger evaluation.
#[derive(Debug, Clone)]
pub struct RiskManager {
    params: RiskParams,
}

impl RiskManager {
    pub fn new(params: RiskParams) -> Self {
        Self { params }
    }

    /// Fraction of capital committed at a given volatility, hard-capped.
    ///
    /// Undefined volatility (warm-up) falls back to the unscaled base
    /// fraction; the cap still applies.
    pub fn sizing_fraction(&self, volatility: f64) -> f64 {
        let scaled = if volatility.is_nan() {
            self.params.base_fraction
        } else {
            self.params.base_fraction / (1.0 + self.params.vol_scale * volatility)
        };
        scaled.min(self.params.max_fraction)
    }

    /// Effective max-hold for a trade opened at the given volatility.
    ///
    /// Resolved once at entry and frozen on the position so mid-trade exit
    /// logic stays deterministic.
    pub fn resolve_max_hold(&self, volatility: f64) -> usize {
        match &self.params.adaptive_hold {
            None => self.params.max_hold_bars,
            Some(adaptive) => {
                if volatility.is_nan() || volatility <= 0.0 {
                    return adaptive
                        .base_hold
                        .clamp(adaptive.min_hold, adaptive.max_hold);
                }
                let scaled =
                    (adaptive.base_hold as f64 * (adaptive.baseline_vol / volatility)).round();
                let scaled = if scaled.is_finite() && scaled >= 0.0 {
                    scaled as usize
                } else {
                    adaptive.base_hold
                };
                scaled.clamp(adaptive.min_hold, adaptive.max_hold)
            }
        }
    }

    /// Open a position at the fill bar's close.
    ///
    /// The engine passes the bar *after* the signal bar here; the manager
    /// never fills at the signal bar's own close. Returns `None` when the
    /// sized quantity rounds down to zero.
    pub fn open(
        &self,
        entry_bar: usize,
        bar: &Bar,
        volatility: f64,
        capital: f64,
    ) -> Option<Position> {
        if bar.close <= 0.0 || capital <= 0.0 {
            return None;
        }
        let fraction = self.sizing_fraction(volatility);
        let quantity = (capital * fraction / bar.close).floor();
        if quantity < 1.0 {
            return None;
        }
        Some(Position {
            symbol: bar.symbol.clone(),
            side: PositionSide::Long,
            entry_bar,
            entry_date: bar.date,
            entry_price: bar.close,
            quantity,
            bars_held: 0,
            max_hold_bars: self.resolve_max_hold(volatility),
        })
    }

    /// Evaluate the exit chain for a live position at one bar.
    pub fn evaluate_exit(
        &self,
        position: &Position,
        bar: &Bar,
        signal: Signal,
    ) -> Option<ExitDecision> {
        // 1. Outlier cap: clamp the exit to the cap boundary.
        let unrealized = position.unrealized_return(bar.close);
        if unrealized.abs() > self.params.return_cap {
            let capped = self.params.return_cap.copysign(unrealized);
            return Some(ExitDecision {
                reason: ExitReason::OutlierCap,
                exit_price: position.entry_price * (1.0 + capped),
            });
        }

        // 2. Strategy-emitted exit.
        if signal == Signal::Exit {
            return Some(ExitDecision {
                reason: ExitReason::Signal,
                exit_price: bar.close,
            });
        }

        // 3. Max-hold reached.
        if position.bars_held >= position.max_hold_bars {
            return Some(ExitDecision {
                reason: ExitReason::MaxHold,
                exit_price: bar.close,
            });
        }

        None
    }

    /// Forced close at the end of the series.
    pub fn end_of_data(&self, bar: &Bar) -> ExitDecision {
        ExitDecision {
            reason: ExitReason::EndOfData,
            exit_price: bar.close,
        }
    }

    /// Round-trip transaction cost for an entry/exit pair.
    pub fn fees(&self, entry_price: f64, exit_price: f64, quantity: f64) -> f64 {
        match self.params.fee_model {
            FeeModel::PerRoundTrip { fee } => fee,
            FeeModel::PercentNotional { rate } => {
                rate * (entry_price + exit_price) * quantity
            }
        }
    }

    /// Convert a position into an immutable trade record.
    pub fn close(
        &self,
        position: Position,
        bar: &Bar,
        exit_bar: usize,
        decision: ExitDecision,
    ) -> Trade {
        let fees = self.fees(position.entry_price, decision.exit_price, position.quantity);
        let gross_pnl = (decision.exit_price - position.entry_price) * position.quantity;
        Trade {
            symbol: position.symbol,
            side: position.side,
            entry_bar: position.entry_bar,
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            exit_bar,
            exit_date: bar.date,
            exit_price: decision.exit_price,
            quantity: position.quantity,
            fees,
            gross_pnl,
            net_pnl: gross_pnl - fees,
            bars_held: exit_bar - position.entry_bar,
            exit_reason: decision.reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AdaptiveHoldParams;
    use chrono::NaiveDate;

    fn make_bar(close: f64) -> Bar {
        Bar::new("SPY", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), close, 1000)
    }

    fn manager(params: RiskParams) -> RiskManager {
        RiskManager::new(params)
    }

    fn open_at(mgr: &RiskManager, close: f64, capital: f64) -> Position {
        mgr.open(0, &make_bar(close), 0.02, capital).unwrap()
    }

    #[test]
    fn sizing_is_floored_share_count() {
        let mgr = manager(RiskParams {
            base_fraction: 1.0,
            max_fraction: 1.0,
            ..Default::default()
        });
        let pos = open_at(&mgr, 98.0, 100_000.0);
        assert_eq!(pos.quantity, 1020.0); // floor(100000 / 98)
    }

    #[test]
    fn sizing_fraction_scales_down_with_volatility() {
        let mgr = manager(RiskParams {
            base_fraction: 0.5,
            vol_scale: 10.0,
            max_fraction: 1.0,
            ..Default::default()
        });
        // 0.5 / (1 + 10 * 0.05) = 1/3
        assert!((mgr.sizing_fraction(0.05) - 0.5 / 1.5).abs() < 1e-12);
        // NaN volatility falls back to base
        assert_eq!(mgr.sizing_fraction(f64::NAN), 0.5);
    }

    #[test]
    fn sizing_fraction_hard_capped() {
        let mgr = manager(RiskParams {
            base_fraction: 0.9,
            vol_scale: 0.0,
            max_fraction: 0.25,
            ..Default::default()
        });
        assert_eq!(mgr.sizing_fraction(0.0), 0.25);
    }

    #[test]
    fn open_returns_none_on_dust_quantity() {
        let mgr = manager(RiskParams {
            base_fraction: 0.01,
            max_fraction: 0.01,
            ..Default::default()
        });
        assert!(mgr.open(0, &make_bar(5_000.0), 0.02, 1_000.0).is_none());
    }

    #[test]
    fn adaptive_hold_scales_inverse_to_volatility() {
        let mgr = manager(RiskParams {
            adaptive_hold: Some(AdaptiveHoldParams {
                base_hold: 10,
                min_hold: 4,
                max_hold: 30,
                baseline_vol: 0.02,
            }),
            ..Default::default()
        });
        // Calm market: half the baseline vol doubles the hold.
        assert_eq!(mgr.resolve_max_hold(0.01), 20);
        // Stormy market: clamped to min.
        assert_eq!(mgr.resolve_max_hold(0.2), 4);
        // Undefined vol: base hold, clamped.
        assert_eq!(mgr.resolve_max_hold(f64::NAN), 10);
    }

    #[test]
    fn fixed_hold_when_adaptive_disabled() {
        let mgr = manager(RiskParams {
            max_hold_bars: 15,
            adaptive_hold: None,
            ..Default::default()
        });
        assert_eq!(mgr.resolve_max_hold(0.01), 15);
        assert_eq!(mgr.resolve_max_hold(0.5), 15);
    }

    #[test]
    fn exit_priority_cap_beats_signal() {
        let mgr = manager(RiskParams {
            base_fraction: 1.0,
            max_fraction: 1.0,
            return_cap: 0.10,
            ..Default::default()
        });
        let pos = open_at(&mgr, 100.0, 100_000.0);
        // +15% unrealized, exit signal also present: cap wins and clamps.
        let decision = mgr.evaluate_exit(&pos, &make_bar(115.0), Signal::Exit).unwrap();
        assert_eq!(decision.reason, ExitReason::OutlierCap);
        assert!((decision.exit_price - 110.0).abs() < 1e-9);
    }

    #[test]
    fn exit_cap_clamps_losses_too() {
        let mgr = manager(RiskParams {
            base_fraction: 1.0,
            max_fraction: 1.0,
            return_cap: 0.10,
            ..Default::default()
        });
        let pos = open_at(&mgr, 100.0, 100_000.0);
        let decision = mgr.evaluate_exit(&pos, &make_bar(80.0), Signal::Hold).unwrap();
        assert_eq!(decision.reason, ExitReason::OutlierCap);
        assert!((decision.exit_price - 90.0).abs() < 1e-9);
    }

    #[test]
    fn exit_signal_before_max_hold() {
        let mgr = manager(RiskParams::default());
        let mut pos = open_at(&mgr, 100.0, 100_000.0);
        pos.bars_held = pos.max_hold_bars; // both conditions true
        let decision = mgr.evaluate_exit(&pos, &make_bar(102.0), Signal::Exit).unwrap();
        assert_eq!(decision.reason, ExitReason::Signal);
    }

    #[test]
    fn exit_max_hold_fires_alone() {
        let mgr = manager(RiskParams::default());
        let mut pos = open_at(&mgr, 100.0, 100_000.0);
        pos.bars_held = pos.max_hold_bars;
        let decision = mgr.evaluate_exit(&pos, &make_bar(102.0), Signal::Hold).unwrap();
        assert_eq!(decision.reason, ExitReason::MaxHold);
    }

    #[test]
    fn no_exit_while_all_conditions_clear() {
        let mgr = manager(RiskParams::default());
        let pos = open_at(&mgr, 100.0, 100_000.0);
        assert!(mgr.evaluate_exit(&pos, &make_bar(102.0), Signal::Hold).is_none());
    }

    #[test]
    fn close_flat_fee_accounting() {
        let mgr = manager(RiskParams {
            base_fraction: 1.0,
            max_fraction: 1.0,
            fee_model: FeeModel::PerRoundTrip { fee: 48.0 },
            ..Default::default()
        });
        let pos = open_at(&mgr, 98.0, 100_000.0);
        let decision = ExitDecision { reason: ExitReason::Signal, exit_price: 103.0 };
        let trade = mgr.close(pos, &make_bar(103.0), 7, decision);
        assert_eq!(trade.fees, 48.0);
        assert_eq!(trade.gross_pnl, 5.0 * 1020.0);
        assert_eq!(trade.net_pnl, 5.0 * 1020.0 - 48.0);
        assert_eq!(trade.bars_held, 7);
        assert_eq!(trade.exit_reason, ExitReason::Signal);
    }

    #[test]
    fn close_percent_notional_fee_accounting() {
        let mgr = manager(RiskParams {
            base_fraction: 1.0,
            max_fraction: 1.0,
            fee_model: FeeModel::PercentNotional { rate: 0.001 },
            ..Default::default()
        });
        let pos = open_at(&mgr, 100.0, 100_000.0);
        let decision = ExitDecision { reason: ExitReason::Signal, exit_price: 110.0 };
        let trade = mgr.close(pos, &make_bar(110.0), 5, decision);
        let expected_fees = 0.001 * (100.0 + 110.0) * 1000.0;
        assert!((trade.fees - expected_fees).abs() < 1e-9);
        assert!((trade.net_pnl - (10.0 * 1000.0 - expected_fees)).abs() < 1e-9);
    }

    #[test]
    fn end_of_data_uses_last_close() {
        let mgr = manager(RiskParams::default());
        let decision = mgr.end_of_data(&make_bar(104.5));
        assert_eq!(decision.reason, ExitReason::EndOfData);
        assert_eq!(decision.exit_price, 104.5);
    }
}
