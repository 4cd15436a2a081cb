//! Feature matrix construction from a bar series and its indicator frame.

use super::ModelError;
use algolab_core::domain::Bar;
use algolab_core::indicators::{keys, IndicatorFrame};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Indicator series feeding the feature matrix, in column order. Each also
/// contributes its one-bar-lagged value for the first two entries.
const FEATURE_KEYS: [&str; 6] = [
    keys::RSI,
    keys::MACD,
    keys::ATR,
    keys::BB_UPPER,
    keys::BB_LOWER,
    keys::WILLR,
];

/// Labelled samples for one ticker. Label 1 means the next bar closed
/// higher than this one.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<u8>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Build the matrix: one row per bar where every feature (including the
    /// lagged ones) is defined and a next-bar label exists. Rows with any
    /// NaN are dropped, mirroring the indicator warmup convention.
    pub fn from_frame(
        symbol: &str,
        bars: &[Bar],
        frame: &IndicatorFrame,
    ) -> Result<Self, ModelError> {
        let _ = symbol;
        let series = resolve_series(frame)?;
        let n = bars.len();

        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 1..n.saturating_sub(1) {
            let Some(row) = feature_row(&series, i) else {
                continue;
            };
            let label = u8::from(bars[i + 1].close > bars[i].close);
            features.push(row);
            labels.push(label);
        }

        Ok(Self {
            feature_names: feature_names(),
            features,
            labels,
        })
    }

    /// Seeded shuffle split into (train, test).
    pub fn split(&self, test_fraction: f64, seed: u64) -> (Dataset, Dataset) {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let n_test = ((self.len() as f64) * test_fraction).round() as usize;
        let (test_idx, train_idx) = indices.split_at(n_test.min(self.len()));

        (self.take(train_idx), self.take(test_idx))
    }

    fn take(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

fn feature_names() -> Vec<String> {
    let mut names: Vec<String> = FEATURE_KEYS.iter().map(|k| k.to_string()).collect();
    names.push(format!("{}_prev", keys::RSI));
    names.push(format!("{}_prev", keys::MACD));
    names
}

fn resolve_series<'a>(frame: &'a IndicatorFrame) -> Result<Vec<&'a [f64]>, ModelError> {
    FEATURE_KEYS
        .iter()
        .map(|&key| {
            frame.get_series(key).ok_or_else(|| ModelError::MissingSeries {
                name: key.to_string(),
            })
        })
        .collect()
}

/// Feature row at bar `i`, or None if any component is undefined.
/// Column order matches [`Dataset::feature_names`]: the six current values
/// followed by lagged RSI and MACD.
fn feature_row(series: &[&[f64]], i: usize) -> Option<Vec<f64>> {
    if i == 0 {
        return None;
    }
    let mut row = Vec::with_capacity(FEATURE_KEYS.len() + 2);
    for s in series {
        row.push(*s.get(i)?);
    }
    row.push(*series[0].get(i - 1)?); // lagged rsi
    row.push(*series[1].get(i - 1)?); // lagged macd
    if row.iter().any(|v| v.is_nan()) {
        return None;
    }
    Some(row)
}

/// Feature row for the final bar of the series, used at prediction time.
pub fn latest_feature_row(bars: &[Bar], frame: &IndicatorFrame) -> Option<Vec<f64>> {
    let series = resolve_series(frame).ok()?;
    let last = bars.len().checked_sub(1)?;
    feature_row(&series, last)
}
