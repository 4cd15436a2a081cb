//! Williams %R.
//!
//! %R = (highest_high(period) - close) / (highest_high - lowest_low) * -100
//! Bounded in [-100, 0]: 0 at the top of the range, -100 at the bottom.
//! Lookback: period - 1 (window includes the current bar).

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
    name: String,
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Williams %R period must be >= 1");
        Self {
            period,
            name: format!("willr_{period}"),
        }
    }
}

impl Indicator for WilliamsR {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let window = &bars[(i + 1 - self.period)..=i];
            let close = bars[i].close;
            if close.is_nan() {
                continue;
            }

            let mut hh = f64::NEG_INFINITY;
            let mut ll = f64::INFINITY;
            let mut valid = true;
            for bar in window {
                if bar.high.is_nan() || bar.low.is_nan() {
                    valid = false;
                    break;
                }
                hh = hh.max(bar.high);
                ll = ll.min(bar.low);
            }
            if !valid {
                continue;
            }

            let range = hh - ll;
            result[i] = if range == 0.0 {
                // Degenerate window with no range: midpoint.
                -50.0
            } else {
                (hh - close) / range * -100.0
            };
        }

        result
    }
}
