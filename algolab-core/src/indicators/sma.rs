//! Simple Moving Average (SMA).
//!
//! Arithmetic mean of close prices over a rolling window.
//! Lookback: period - 1 (first valid value at index period-1).

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        // Daily series are short enough that a per-window scan is fine and
        // keeps NaN handling exact: any NaN in the window voids that value.
        for i in (self.period - 1)..n {
            let window = &bars[(i + 1 - self.period)..=i];
            let mut sum = 0.0;
            let mut valid = true;
            for bar in window {
                if bar.close.is_nan() {
                    valid = false;
                    break;
                }
                sum += bar.close;
            }
            if valid {
                result[i] = sum / self.period as f64;
            }
        }

        result
    }
}
