//! Relative Strength Index (RSI).
//!
//! Close-to-close changes are split into a gain series and a loss series,
//! each run through the same Wilder smoothing as ATR, then combined:
//! RSI = 100 * avg_gain / (avg_gain + avg_loss)
//! Lookback: period (first valid value at index `period`).
//! Edge cases: no losses → 100; no gains → 0; a flat window → 50.

use super::atr::wilder_smooth;
use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

/// Split close-to-close changes into non-negative gain and loss series.
/// Index 0 has no previous close and stays NaN in both, which keeps the
/// smoothed lookback at exactly `period`.
fn gain_loss_series(bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut gains = vec![f64::NAN; n];
    let mut losses = vec![f64::NAN; n];

    for i in 1..n {
        let change = bars[i].close - bars[i - 1].close;
        if change.is_nan() {
            continue;
        }
        gains[i] = change.max(0.0);
        losses[i] = (-change).max(0.0);
    }

    (gains, losses)
}

/// Combine smoothed averages into the 0..=100 index.
fn relative_strength(avg_gain: f64, avg_loss: f64) -> f64 {
    let total = avg_gain + avg_loss;
    if total == 0.0 {
        return 50.0; // flat window, no direction either way
    }
    100.0 * avg_gain / total
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let (gains, losses) = gain_loss_series(bars);
        let avg_gains = wilder_smooth(&gains, self.period);
        let avg_losses = wilder_smooth(&losses, self.period);

        avg_gains
            .iter()
            .zip(&avg_losses)
            .map(|(&g, &l)| {
                if g.is_nan() || l.is_nan() {
                    f64::NAN
                } else {
                    relative_strength(g, l)
                }
            })
            .collect()
    }
}
