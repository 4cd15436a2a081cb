//! RSI-armed moving-average crossover rule — the canonical variant.
//!
//! An RSI dip below the threshold arms the rule. While armed, a golden
//! cross (SMA20 crossing above SMA50) fires a buy and disarms it. A death
//! cross (SMA50 crossing above SMA20) proposes an exit; the simulator
//! ignores it unless a position is open.
//!
//! If RSI or either SMA (current or previous bar) is undefined, the bar is
//! a hold and the armed flag is left untouched.

use super::{RuleState, SignalRule};
use crate::domain::Signal;
use crate::indicators::{keys, IndicatorFrame};

#[derive(Debug, Clone)]
pub struct RsiMaCrossover {
    pub threshold: f64,
}

impl RsiMaCrossover {
    pub fn new(threshold: f64) -> Self {
        assert!(
            (0.0..=100.0).contains(&threshold),
            "RSI threshold must be in [0, 100]"
        );
        Self { threshold }
    }
}

impl Default for RsiMaCrossover {
    fn default() -> Self {
        Self::new(30.0)
    }
}

impl SignalRule for RsiMaCrossover {
    fn name(&self) -> &str {
        "rsi_ma_crossover"
    }

    fn evaluate(&self, frame: &IndicatorFrame, bar_index: usize, state: &mut RuleState) -> Signal {
        // Crossover detection needs the previous bar.
        if bar_index == 0 {
            return Signal::Hold;
        }

        let rsi = frame.get(keys::RSI, bar_index);
        let fast_cur = frame.get(keys::SMA_FAST, bar_index);
        let slow_cur = frame.get(keys::SMA_SLOW, bar_index);
        let fast_prev = frame.get(keys::SMA_FAST, bar_index - 1);
        let slow_prev = frame.get(keys::SMA_SLOW, bar_index - 1);

        let (rsi, fast_cur, slow_cur, fast_prev, slow_prev) =
            match (rsi, fast_cur, slow_cur, fast_prev, slow_prev) {
                (Some(r), Some(fc), Some(sc), Some(fp), Some(sp))
                    if !r.is_nan()
                        && !fc.is_nan()
                        && !sc.is_nan()
                        && !fp.is_nan()
                        && !sp.is_nan() =>
                {
                    (r, fc, sc, fp, sp)
                }
                // Insufficient lookback: hold, no flag update.
                _ => return Signal::Hold,
            };

        if rsi < self.threshold {
            state.oversold = true;
        }

        // Golden cross: fast crosses above slow.
        if state.oversold && fast_prev <= slow_prev && fast_cur > slow_cur {
            state.oversold = false;
            return Signal::Buy;
        }

        // Death cross: slow crosses above fast.
        if fast_prev >= slow_prev && fast_cur < slow_cur {
            return Signal::Close;
        }

        Signal::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(rsi: Vec<f64>, fast: Vec<f64>, slow: Vec<f64>) -> IndicatorFrame {
        let mut frame = IndicatorFrame::new();
        frame.insert(keys::RSI, rsi);
        frame.insert(keys::SMA_FAST, fast);
        frame.insert(keys::SMA_SLOW, slow);
        frame
    }

    #[test]
    fn unarmed_golden_cross_does_not_buy() {
        // RSI never dips below 30; cross at index 2.
        let frame = frame_with(
            vec![55.0, 55.0, 55.0],
            vec![95.0, 95.0, 105.0],
            vec![100.0, 100.0, 100.0],
        );
        let rule = RsiMaCrossover::new(30.0);
        let mut state = RuleState::default();
        assert_eq!(rule.evaluate(&frame, 1, &mut state), Signal::Hold);
        assert_eq!(rule.evaluate(&frame, 2, &mut state), Signal::Hold);
        assert!(!state.oversold);
    }

    #[test]
    fn oversold_dip_arms_then_cross_buys_and_disarms() {
        // Dip at index 1 arms; cross at index 3 buys and resets the flag.
        let frame = frame_with(
            vec![55.0, 25.0, 55.0, 55.0],
            vec![95.0, 95.0, 95.0, 105.0],
            vec![100.0, 100.0, 100.0, 100.0],
        );
        let rule = RsiMaCrossover::new(30.0);
        let mut state = RuleState::default();

        assert_eq!(rule.evaluate(&frame, 1, &mut state), Signal::Hold);
        assert!(state.oversold, "dip below threshold should arm");
        assert_eq!(rule.evaluate(&frame, 2, &mut state), Signal::Hold);
        assert_eq!(rule.evaluate(&frame, 3, &mut state), Signal::Buy);
        assert!(!state.oversold, "buy should disarm");
    }

    #[test]
    fn same_bar_dip_and_cross_fires() {
        // RSI below threshold on the cross bar itself also counts.
        let frame = frame_with(
            vec![55.0, 25.0],
            vec![95.0, 105.0],
            vec![100.0, 100.0],
        );
        let rule = RsiMaCrossover::new(30.0);
        let mut state = RuleState::default();
        assert_eq!(rule.evaluate(&frame, 1, &mut state), Signal::Buy);
    }

    #[test]
    fn death_cross_proposes_close() {
        let frame = frame_with(
            vec![55.0, 55.0],
            vec![105.0, 95.0],
            vec![100.0, 100.0],
        );
        let rule = RsiMaCrossover::new(30.0);
        let mut state = RuleState::default();
        assert_eq!(rule.evaluate(&frame, 1, &mut state), Signal::Close);
    }

    #[test]
    fn undefined_indicator_holds_without_flag_update() {
        let frame = frame_with(
            vec![25.0, f64::NAN],
            vec![95.0, 105.0],
            vec![100.0, 100.0],
        );
        let rule = RsiMaCrossover::new(30.0);
        let mut state = RuleState::default();
        // Index 1 has NaN RSI: hold, and the dip at index 1 must not arm.
        assert_eq!(rule.evaluate(&frame, 1, &mut state), Signal::Hold);
        assert!(!state.oversold);
    }

    #[test]
    fn first_bar_always_holds() {
        let frame = frame_with(vec![10.0], vec![105.0], vec![100.0]);
        let rule = RsiMaCrossover::new(30.0);
        let mut state = RuleState::default();
        assert_eq!(rule.evaluate(&frame, 0, &mut state), Signal::Hold);
    }

    #[test]
    fn touching_threshold_does_not_arm() {
        let frame = frame_with(
            vec![55.0, 30.0],
            vec![95.0, 96.0],
            vec![100.0, 100.0],
        );
        let rule = RsiMaCrossover::new(30.0);
        let mut state = RuleState::default();
        rule.evaluate(&frame, 1, &mut state);
        assert!(!state.oversold, "RSI == threshold is not a dip");
    }
}
