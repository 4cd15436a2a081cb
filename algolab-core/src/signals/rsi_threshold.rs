//! RSI threshold rule — buy whenever RSI is below the oversold threshold.
//!
//! The simpler of the two rule variants: no crossover confirmation, no
//! position awareness, no state. It never proposes an exit; a simulated
//! position rides until the end of the series.

use super::{RuleState, SignalRule};
use crate::domain::Signal;
use crate::indicators::{keys, IndicatorFrame};

#[derive(Debug, Clone)]
pub struct RsiThreshold {
    pub threshold: f64,
}

impl RsiThreshold {
    pub fn new(threshold: f64) -> Self {
        assert!(
            (0.0..=100.0).contains(&threshold),
            "RSI threshold must be in [0, 100]"
        );
        Self { threshold }
    }
}

impl Default for RsiThreshold {
    fn default() -> Self {
        Self::new(30.0)
    }
}

impl SignalRule for RsiThreshold {
    fn name(&self) -> &str {
        "rsi_threshold"
    }

    fn evaluate(&self, frame: &IndicatorFrame, bar_index: usize, _state: &mut RuleState) -> Signal {
        let rsi = match frame.get(keys::RSI, bar_index) {
            Some(v) if !v.is_nan() => v,
            _ => return Signal::Hold,
        };

        if rsi < self.threshold {
            Signal::Buy
        } else {
            Signal::Hold
        }
    }
}
