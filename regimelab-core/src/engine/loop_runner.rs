//! Bar-by-bar event loop — the heart of the backtesting engine.
//!
//! Single pass in strict time order. Per bar: fill any pending entry at
//! this bar's close, then either evaluate the exit chain (live position) or
//! evaluate entry intent (flat, scheduling the fill for the next bar).
//! The run finalizes by force-closing a still-live position at the last
//! bar. State machine per run: Flat → Open → Flat → … → Flat(terminal).
//!
//! The whole function is pure and deterministic given `(bars, params,
//! config)`: no I/O, no shared state, so callers may dispatch runs across
//! threads freely.

use crate::domain::{Bar, Ledger, PositionState, StrategyParams};
use crate::error::DataError;
use crate::regime::classify_series;
use crate::risk::RiskManager;
use crate::strategy::{build_strategy, Signal};

use super::precompute::{collect_indicators, compute_warmup, precompute_frame};
use super::state::{BacktestRun, EngineConfig};
use super::validate::validate_bars;

/// Run a backtest over one symbol's bar series.
///
/// Validates the bars, precomputes indicators and the regime series, then
/// drives the position state machine. Entries signalled at bar `i` fill at
/// bar `i + 1`'s close — never at the signal bar's own close; a signal on
/// the final bar is dropped.
pub fn run_backtest(
    bars: &[Bar],
    params: &StrategyParams,
    config: &EngineConfig,
) -> Result<BacktestRun, DataError> {
    validate_bars(bars)?;

    let strategy = build_strategy(&params.signal, &params.regime);
    let indicators = collect_indicators(strategy.as_ref(), &params.regime);
    let frame = precompute_frame(bars, &indicators);
    let warmup_bars = compute_warmup(&indicators);
    let regimes = classify_series(&frame, bars.len(), &params.regime);

    let risk = RiskManager::new(params.risk.clone());
    let vol_key = format!("vol_{}", params.regime.vol_window);

    let mut ledger = Ledger::new(config.initial_capital);
    let mut state = PositionState::Flat;
    let mut pending_entry = false;
    let mut signal_count = 0usize;

    for (i, bar) in bars.iter().enumerate() {
        // Fill an entry scheduled on the previous bar at this bar's close.
        if std::mem::take(&mut pending_entry) {
            let volatility = frame.get(&vol_key, i).unwrap_or(f64::NAN);
            if let Some(position) = risk.open(i, bar, volatility, ledger.capital()) {
                state = PositionState::Open(position);
            }
        }

        match &mut state {
            PositionState::Open(position) => {
                position.bars_held = i - position.entry_bar;
                let signal = strategy.evaluate(bars, i, &frame, regimes[i]);
                if signal == Signal::Exit {
                    signal_count += 1;
                }
                if let Some(decision) = risk.evaluate_exit(position, bar, signal) {
                    if let PositionState::Open(position) = std::mem::take(&mut state) {
                        ledger.record(risk.close(position, bar, i, decision));
                    }
                }
            }
            PositionState::Flat => {
                if i < warmup_bars {
                    continue;
                }
                let signal = strategy.evaluate(bars, i, &frame, regimes[i]);
                if signal == Signal::EnterLong {
                    signal_count += 1;
                    if i + 1 < bars.len() {
                        pending_entry = true;
                    }
                }
            }
        }
    }

    // Finalize: a position still live at series end is force-closed at the
    // last bar.
    if let PositionState::Open(position) = state {
        let last_index = bars.len() - 1;
        let last_bar = &bars[last_index];
        let decision = risk.end_of_data(last_bar);
        ledger.record(risk.close(position, last_bar, last_index, decision));
    }

    Ok(BacktestRun {
        ledger,
        regimes,
        signal_count,
        bar_count: bars.len(),
        warmup_bars,
    })
}
