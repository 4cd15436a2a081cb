//! Bollinger Bands — SMA(period) +/- mult * standard deviation.
//!
//! Three bands exposed as separate `Indicator` instances:
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev
//! - Lower: middle - mult * stddev
//!
//! Uses population stddev (divide by N). Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    mult: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn new(period: usize, mult: f64, band: BollingerBand) -> Self {
        assert!(period >= 2, "Bollinger period must be >= 2");
        assert!(mult > 0.0, "Bollinger multiplier must be positive");
        let suffix = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            mult,
            band,
            name: format!("bollinger_{period}_{suffix}"),
        }
    }
}

impl Indicator for Bollinger {
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
            if window.iter().any(|b| b.close.is_nan()) {
                continue;
            }

            let mean = window.iter().map(|b| b.close).sum::<f64>() / self.period as f64;
            let var = window
                .iter()
                .map(|b| (b.close - mean).powi(2))
                .sum::<f64>()
                / self.period as f64;
            let sd = var.sqrt();

            result[i] = match self.band {
                BollingerBand::Upper => mean + self.mult * sd,
                BollingerBand::Middle => mean,
                BollingerBand::Lower => mean - self.mult * sd,
            };
        }

        result
    }
}
