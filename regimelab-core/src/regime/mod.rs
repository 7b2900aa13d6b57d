//! Regime classification — maps (efficiency ratio, volatility) per bar to a
//! discrete market regime.
//!
//! Stateless per bar by default. With `dwell_bars > 0`, a minimum-dwell
//! hysteresis is applied: the reported regime switches only after the raw
//! classification has persisted for that many consecutive bars, which keeps
//! the series from flapping on threshold noise.

use crate::domain::RegimeParams;
use crate::indicators::IndicatorFrame;
use serde::{Deserialize, Serialize};

/// Discrete market-behavior classification for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    MeanReverting,
    Transitional,
    Trending,
}

/// Classify a single bar from its efficiency ratio and volatility.
///
/// Returns `None` while either input is undefined (warm-up): downstream
/// consumers treat that as "no signal", never as a default regime.
pub fn classify(er: f64, vol: f64, params: &RegimeParams) -> Option<Regime> {
    if er.is_nan() || vol.is_nan() {
        return None;
    }
    Some(if er < params.er_low {
        Regime::MeanReverting
    } else if er > params.er_high {
        Regime::Trending
    } else {
        Regime::Transitional
    })
}

/// Minimum-dwell hysteresis state machine.
///
/// Tracks the reported regime plus a pending candidate and its run length.
/// The reported regime switches to the candidate only once it has been
/// observed `dwell_bars` consecutive times.
#[derive(Debug, Clone, Default)]
struct DwellState {
    current: Option<Regime>,
    pending: Option<Regime>,
    pending_count: usize,
}

impl DwellState {
    fn observe(&mut self, raw: Option<Regime>, dwell_bars: usize) -> Option<Regime> {
        let raw = match raw {
            Some(r) => r,
            // Undefined input: hold the current regime, reset the candidate.
            None => {
                self.pending = None;
                self.pending_count = 0;
                return self.current;
            }
        };

        match self.current {
            // First defined classification seeds the state directly.
            None => {
                self.current = Some(raw);
                self.pending = None;
                self.pending_count = 0;
            }
            Some(current) if raw == current => {
                self.pending = None;
                self.pending_count = 0;
            }
            Some(_) => {
                if self.pending == Some(raw) {
                    self.pending_count += 1;
                } else {
                    self.pending = Some(raw);
                    self.pending_count = 1;
                }
                if self.pending_count >= dwell_bars {
                    self.current = Some(raw);
                    self.pending = None;
                    self.pending_count = 0;
                }
            }
        }
        self.current
    }
}

/// Precompute the per-bar regime series from the indicator frame.
///
/// A causal fold: the value at bar i depends only on ER/volatility values at
/// bars `<= i`.
pub fn classify_series(
    frame: &IndicatorFrame,
    n_bars: usize,
    params: &RegimeParams,
) -> Vec<Option<Regime>> {
    let er_key = format!("er_{}", params.er_window);
    let vol_key = format!("vol_{}", params.vol_window);

    let mut dwell = DwellState::default();
    (0..n_bars)
        .map(|i| {
            let er = frame.get(&er_key, i).unwrap_or(f64::NAN);
            let vol = frame.get(&vol_key, i).unwrap_or(f64::NAN);
            let raw = classify(er, vol, params);
            if params.dwell_bars == 0 {
                raw
            } else {
                dwell.observe(raw, params.dwell_bars)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(dwell: usize) -> RegimeParams {
        RegimeParams {
            er_window: 3,
            er_low: 0.3,
            er_high: 0.7,
            vol_window: 3,
            dwell_bars: dwell,
        }
    }

    #[test]
    fn classify_thresholds() {
        let p = params(0);
        assert_eq!(classify(0.1, 0.02, &p), Some(Regime::MeanReverting));
        assert_eq!(classify(0.5, 0.02, &p), Some(Regime::Transitional));
        assert_eq!(classify(0.9, 0.02, &p), Some(Regime::Trending));
    }

    #[test]
    fn classify_cuts_are_strict() {
        let p = params(0);
        // Exactly at a cut is transitional, not the adjacent regime.
        assert_eq!(classify(0.3, 0.02, &p), Some(Regime::Transitional));
        assert_eq!(classify(0.7, 0.02, &p), Some(Regime::Transitional));
    }

    #[test]
    fn classify_undefined_inputs() {
        let p = params(0);
        assert_eq!(classify(f64::NAN, 0.02, &p), None);
        assert_eq!(classify(0.5, f64::NAN, &p), None);
    }

    fn frame_with(er: Vec<f64>, vol: Vec<f64>) -> IndicatorFrame {
        let mut frame = IndicatorFrame::new();
        frame.insert("er_3", er);
        frame.insert("vol_3", vol);
        frame
    }

    #[test]
    fn series_stateless() {
        let frame = frame_with(
            vec![f64::NAN, 0.1, 0.9, 0.5],
            vec![f64::NAN, 0.02, 0.02, 0.02],
        );
        let series = classify_series(&frame, 4, &params(0));
        assert_eq!(
            series,
            vec![
                None,
                Some(Regime::MeanReverting),
                Some(Regime::Trending),
                Some(Regime::Transitional),
            ]
        );
    }

    #[test]
    fn dwell_delays_switch_until_persistent() {
        // Raw: MR, MR, T, MR, T, T, T — with dwell 2 the switch to Trending
        // lands only after two consecutive trending bars.
        let er = vec![0.1, 0.1, 0.9, 0.1, 0.9, 0.9, 0.9];
        let vol = vec![0.02; 7];
        let series = classify_series(&frame_with(er, vol), 7, &params(2));
        assert_eq!(
            series,
            vec![
                Some(Regime::MeanReverting),
                Some(Regime::MeanReverting),
                Some(Regime::MeanReverting), // single contrary bar ignored
                Some(Regime::MeanReverting),
                Some(Regime::MeanReverting), // first trending bar of the run
                Some(Regime::Trending),      // second consecutive → switch
                Some(Regime::Trending),
            ]
        );
    }

    #[test]
    fn dwell_holds_through_undefined_gap() {
        let er = vec![0.1, 0.1, f64::NAN, 0.1];
        let vol = vec![0.02; 4];
        let series = classify_series(&frame_with(er, vol), 4, &params(2));
        assert_eq!(series[2], Some(Regime::MeanReverting));
        assert_eq!(series[3], Some(Regime::MeanReverting));
    }

    #[test]
    fn dwell_zero_matches_stateless() {
        let er = vec![0.1, 0.9, 0.1, 0.9];
        let vol = vec![0.02; 4];
        let stateless = classify_series(&frame_with(er.clone(), vol.clone()), 4, &params(0));
        let p = params(0);
        let expected: Vec<_> = er.iter().map(|&e| classify(e, 0.02, &p)).collect();
        assert_eq!(stateless, expected);
    }
}
