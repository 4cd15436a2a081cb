//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1],
//! alpha = 2 / (period + 1). Seed: SMA of the first `period` values.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.period)
    }
}

/// Compute EMA over a raw f64 series.
///
/// Tolerates a leading NaN prefix (as produced by upstream indicators): the
/// seed window starts at the first index with `period` consecutive valid
/// values. A NaN after the seed taints everything from that point on.
///
/// Used by `Ema::compute` and by the MACD signal line, which takes the EMA
/// of the MACD series rather than of close prices.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let seed_start = match first_valid_run(values, period) {
        Some(s) => s,
        None => return result,
    };
    let seed_end = seed_start + period;

    let seed: f64 = values[seed_start..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = seed;
    for i in seed_end..n {
        if values[i].is_nan() {
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}

/// First index at which `len` consecutive non-NaN values begin, or None.
pub(crate) fn first_valid_run(values: &[f64], len: usize) -> Option<usize> {
    let n = values.len();
    let mut run_start = 0;
    let mut run_len = 0;
    for (i, v) in values.iter().enumerate().take(n) {
        if v.is_nan() {
            run_start = i + 1;
            run_len = 0;
        } else {
            run_len += 1;
            if run_len == len {
                return Some(run_start);
            }
        }
    }
    None
}
