//! MACD (Moving Average Convergence Divergence).
//!
//! MACD line: EMA(close, fast) - EMA(close, slow).
//! Signal line: EMA(MACD line, signal_period).
//! Defaults are the textbook 12/26/9.
//! Lookback: slow - 1 for the MACD line; the signal line needs a further
//! signal_period - 1 valid MACD values.

use super::ema::ema_of_series;
use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
}

/// MACD parameter set. Use [`Macd::line`] to obtain an `Indicator` for one
/// of the two output series.
#[derive(Debug, Clone, Copy)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(slow > fast, "slow period must be > fast period");
        Self { fast, slow, signal }
    }

    pub fn line(self, line: MacdLine) -> MacdIndicator {
        let suffix = match line {
            MacdLine::Macd => "macd",
            MacdLine::Signal => "signal",
        };
        MacdIndicator {
            params: self,
            line,
            name: format!("macd_{}_{}_{}_{suffix}", self.fast, self.slow, self.signal),
        }
    }

    /// The MACD line: fast EMA minus slow EMA. NaN wherever either is NaN.
    fn macd_series(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}

/// One MACD output series as an `Indicator`.
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    params: Macd,
    line: MacdLine,
    name: String,
}

impl Indicator for MacdIndicator {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Macd => self.params.slow - 1,
            MacdLine::Signal => self.params.slow - 1 + self.params.signal - 1,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let macd = self.params.macd_series(bars);
        match self.line {
            MacdLine::Macd => macd,
            MacdLine::Signal => ema_of_series(&macd, self.params.signal),
        }
    }
}
