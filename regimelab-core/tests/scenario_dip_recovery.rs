//! Acceptance scenario: a synthetic 30-bar dip-then-recovery series must
//! produce exactly one trade with deterministic entry/exit indices and a
//! capital delta of `(exit_price - entry_price) * quantity - fee`.

use chrono::NaiveDate;
use regimelab_core::domain::{
    Bar, FeeModel, MeanReversionParams, RegimeParams, RiskParams, SignalParams, StrategyParams,
};
use regimelab_core::engine::{run_backtest, EngineConfig};
use regimelab_core::fingerprint::ledger_fingerprint;
use regimelab_core::risk::ExitReason;

/// 30 bars: a gentle rise, a three-bar dip, a four-bar recovery, then a
/// slow upward drift.
fn scenario_bars() -> Vec<Bar> {
    let mut closes: Vec<f64> = (0..10).map(|i| 100.0 + 0.5 * i as f64).collect();
    closes.extend([101.0, 98.0, 96.0]); // dip: bars 10-12
    closes.extend([99.0, 102.0, 104.0, 105.0]); // recovery: bars 13-16
    closes.extend((1..=13).map(|i| 105.0 + 0.25 * i as f64)); // drift: bars 17-29
    assert_eq!(closes.len(), 30);

    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Bar::new("SCEN", base_date + chrono::Duration::days(i as i64), close, 1000)
        })
        .collect()
}

fn scenario_params() -> StrategyParams {
    StrategyParams::new(
        SignalParams::MeanReversion(MeanReversionParams {
            rsi_period: 2,
            entry_threshold: 30.0,
            exit_threshold: 70.0,
            boost: 0.0,
            vol_floor: 0.0,
        }),
        RegimeParams {
            er_window: 3,
            er_low: 0.3,
            er_high: 1.0,
            vol_window: 2,
            dwell_bars: 0,
        },
        RiskParams {
            base_fraction: 1.0,
            vol_scale: 0.0,
            max_fraction: 1.0,
            max_hold_bars: 50,
            adaptive_hold: None,
            return_cap: 5.0,
            fee_model: FeeModel::PerRoundTrip { fee: 48.0 },
        },
    )
    .unwrap()
}

#[test]
fn thirty_bar_dip_recovery_single_trade() {
    let bars = scenario_bars();
    let params = scenario_params();
    let config = EngineConfig::new(100_000.0);

    let run = run_backtest(&bars, &params, &config).unwrap();

    // Exactly one trade.
    assert_eq!(run.ledger.len(), 1);
    let trade = &run.ledger.trades()[0];

    // RSI(2) collapses to 12.5 on the first dip bar (bar 10); the entry
    // fills at the next bar's close. The RSI recovery crosses 70 at bar 14.
    assert_eq!(trade.entry_bar, 11);
    assert_eq!(trade.entry_price, 98.0);
    assert_eq!(trade.exit_bar, 14);
    assert_eq!(trade.exit_price, 102.0);
    assert_eq!(trade.exit_reason, ExitReason::Signal);

    // quantity = floor(100_000 * 1.0 / 98) = 1020
    assert_eq!(trade.quantity, 1020.0);
    assert_eq!(trade.fees, 48.0);

    // Capital delta = (exit - entry) * quantity - fee.
    let expected_delta = (102.0 - 98.0) * 1020.0 - 48.0;
    let delta = run.final_capital() - run.ledger.initial_capital();
    assert!(
        (delta - expected_delta).abs() < 1e-9,
        "capital delta {delta} != expected {expected_delta}"
    );
    assert!(run.final_capital().is_finite());
}

#[test]
fn scenario_replay_is_byte_identical() {
    let bars = scenario_bars();
    let params = scenario_params();
    let config = EngineConfig::new(100_000.0);

    let first = run_backtest(&bars, &params, &config).unwrap();
    let second = run_backtest(&bars, &params, &config).unwrap();
    assert_eq!(
        ledger_fingerprint(&first.ledger),
        ledger_fingerprint(&second.ledger)
    );
}
