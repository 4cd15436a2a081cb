//! Signal rules — threshold/crossover logic over the indicator frame.
//!
//! Two rule variants exist in this codebase and are deliberately kept
//! separate, selectable by configuration:
//! - [`RsiThreshold`]: buy whenever RSI is below the threshold. Stateless.
//! - [`RsiMaCrossover`]: an RSI dip below the threshold arms the rule; the
//!   buy fires on the next SMA20/SMA50 golden cross. Carries one boolean of
//!   state across bars.
//!
//! Rules only propose. The simulator decides whether a proposal is
//! actionable given its position state.

pub mod rsi_ma_crossover;
pub mod rsi_threshold;

pub use rsi_ma_crossover::RsiMaCrossover;
pub use rsi_threshold::RsiThreshold;

use crate::domain::Signal;
use crate::indicators::IndicatorFrame;

/// Rule state threaded explicitly through the per-bar fold.
///
/// The armed-by-oversold flag lives here rather than inside the rule so a
/// rule value stays immutable and a series can be re-evaluated from scratch
/// deterministically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleState {
    pub oversold: bool,
}

/// A signal rule: per-bar pure function of the indicator frame at the
/// current and previous index, plus the explicit fold state.
pub trait SignalRule: Send + Sync {
    fn name(&self) -> &str;

    /// Evaluate the rule at `bar_index`, updating `state` in place.
    ///
    /// During indicator warmup the frame holds NaN and the rule holds;
    /// there is no separate warmup bookkeeping.
    fn evaluate(&self, frame: &IndicatorFrame, bar_index: usize, state: &mut RuleState) -> Signal;
}

/// Evaluate a rule over a whole series as a fold with fresh initial state.
pub fn signal_series(rule: &dyn SignalRule, n_bars: usize, frame: &IndicatorFrame) -> Vec<Signal> {
    let mut state = RuleState::default();
    (0..n_bars)
        .map(|i| rule.evaluate(frame, i, &mut state))
        .collect()
}
