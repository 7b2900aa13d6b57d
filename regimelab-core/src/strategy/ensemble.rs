//! Ensemble strategy — quorum vote over N parameter variants of one inner
//! strategy type.
//!
//! Each member is evaluated independently on the same bar; the ensemble
//! emits ENTER or EXIT only when at least `quorum` members agree. A bar
//! where both intents reach quorum is ambiguous and resolves to no signal.

use super::{Signal, Strategy};
use crate::domain::Bar;
use crate::indicators::{Indicator, IndicatorFrame};
use crate::regime::Regime;

pub struct Ensemble {
    members: Vec<Box<dyn Strategy>>,
    quorum: usize,
    name: String,
}

impl Ensemble {
    pub fn new(members: Vec<Box<dyn Strategy>>, quorum: usize) -> Self {
        assert!(!members.is_empty(), "ensemble must have members");
        assert!(
            (1..=members.len()).contains(&quorum),
            "quorum {quorum} out of range for {} members",
            members.len()
        );
        let name = format!(
            "ensemble_{}_{}of{}",
            members[0].name(),
            quorum,
            members.len()
        );
        Self {
            members,
            quorum,
            name,
        }
    }

    /// Tally member votes at one bar.
    pub fn votes(
        &self,
        bars: &[Bar],
        bar_index: usize,
        frame: &IndicatorFrame,
        regime: Option<Regime>,
    ) -> (usize, usize) {
        let mut enter = 0;
        let mut exit = 0;
        for member in &self.members {
            match member.evaluate(bars, bar_index, frame, regime) {
                Signal::EnterLong => enter += 1,
                Signal::Exit => exit += 1,
                Signal::Hold => {}
            }
        }
        (enter, exit)
    }
}

impl Strategy for Ensemble {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_bars(&self) -> usize {
        self.members
            .iter()
            .map(|m| m.warmup_bars())
            .max()
            .unwrap_or(0)
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        // Duplicate names are deduplicated when the frame is built.
        self.members
            .iter()
            .flat_map(|m| m.indicators())
            .collect()
    }

    fn evaluate(
        &self,
        bars: &[Bar],
        bar_index: usize,
        frame: &IndicatorFrame,
        regime: Option<Regime>,
    ) -> Signal {
        let (enter, exit) = self.votes(bars, bar_index, frame, regime);
        let enter_quorum = enter >= self.quorum;
        let exit_quorum = exit >= self.quorum;
        match (enter_quorum, exit_quorum) {
            (true, false) => Signal::EnterLong,
            (false, true) => Signal::Exit,
            // Both at quorum is ambiguous; neither is no agreement.
            _ => Signal::Hold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    /// Fixed-output member for vote-counting tests.
    struct FixedSignal(Signal);

    impl Strategy for FixedSignal {
        fn name(&self) -> &str {
            "fixed"
        }
        fn warmup_bars(&self) -> usize {
            0
        }
        fn indicators(&self) -> Vec<Box<dyn Indicator>> {
            Vec::new()
        }
        fn evaluate(
            &self,
            _bars: &[Bar],
            _bar_index: usize,
            _frame: &IndicatorFrame,
            _regime: Option<Regime>,
        ) -> Signal {
            self.0
        }
    }

    fn ensemble_of(signals: &[Signal], quorum: usize) -> Ensemble {
        let members: Vec<Box<dyn Strategy>> = signals
            .iter()
            .map(|&s| Box::new(FixedSignal(s)) as Box<dyn Strategy>)
            .collect();
        Ensemble::new(members, quorum)
    }

    #[test]
    fn quorum_met_emits_enter() {
        let e = ensemble_of(&[Signal::EnterLong, Signal::EnterLong, Signal::Hold], 2);
        let bars = make_bars(&[100.0]);
        assert_eq!(
            e.evaluate(&bars, 0, &IndicatorFrame::new(), None),
            Signal::EnterLong
        );
    }

    #[test]
    fn below_quorum_holds() {
        let e = ensemble_of(&[Signal::EnterLong, Signal::Hold, Signal::Hold], 2);
        let bars = make_bars(&[100.0]);
        assert_eq!(e.evaluate(&bars, 0, &IndicatorFrame::new(), None), Signal::Hold);
    }

    #[test]
    fn exit_quorum_emits_exit() {
        let e = ensemble_of(&[Signal::Exit, Signal::Exit, Signal::EnterLong], 2);
        let bars = make_bars(&[100.0]);
        assert_eq!(e.evaluate(&bars, 0, &IndicatorFrame::new(), None), Signal::Exit);
    }

    #[test]
    fn conflicting_quorums_resolve_to_hold() {
        let e = ensemble_of(&[Signal::EnterLong, Signal::Exit], 1);
        let bars = make_bars(&[100.0]);
        assert_eq!(e.evaluate(&bars, 0, &IndicatorFrame::new(), None), Signal::Hold);
    }

    #[test]
    fn raising_quorum_never_adds_signals() {
        // For every vote pattern, the set of bars where quorum k fires only
        // shrinks as k grows.
        let patterns: &[&[Signal]] = &[
            &[Signal::EnterLong, Signal::EnterLong, Signal::Hold],
            &[Signal::EnterLong, Signal::Hold, Signal::Hold],
            &[Signal::EnterLong, Signal::EnterLong, Signal::EnterLong],
            &[Signal::Hold, Signal::Hold, Signal::Hold],
        ];
        let bars = make_bars(&[100.0]);
        for pattern in patterns {
            let mut previous_fired = true;
            for quorum in 1..=pattern.len() {
                let e = ensemble_of(pattern, quorum);
                let fired =
                    e.evaluate(&bars, 0, &IndicatorFrame::new(), None) == Signal::EnterLong;
                assert!(
                    previous_fired || !fired,
                    "quorum {quorum} fired after a lower quorum did not"
                );
                previous_fired = fired;
            }
        }
    }

    #[test]
    fn warmup_is_max_over_members() {
        struct Slow;
        impl Strategy for Slow {
            fn name(&self) -> &str {
                "slow"
            }
            fn warmup_bars(&self) -> usize {
                25
            }
            fn indicators(&self) -> Vec<Box<dyn Indicator>> {
                Vec::new()
            }
            fn evaluate(
                &self,
                _bars: &[Bar],
                _bar_index: usize,
                _frame: &IndicatorFrame,
                _regime: Option<Regime>,
            ) -> Signal {
                Signal::Hold
            }
        }
        let e = Ensemble::new(
            vec![Box::new(FixedSignal(Signal::Hold)), Box::new(Slow)],
            1,
        );
        assert_eq!(e.warmup_bars(), 25);
    }

    #[test]
    #[should_panic(expected = "quorum")]
    fn quorum_above_member_count_panics() {
        ensemble_of(&[Signal::Hold], 2);
    }
}
