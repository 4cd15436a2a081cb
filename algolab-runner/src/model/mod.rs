//! Next-day direction classifier.
//!
//! A per-ticker decision tree trained on lagged indicator features. The
//! label is whether the next bar's close exceeds the current close; every
//! feature row uses only data available at that bar, so training shares
//! the simulator's point-in-time discipline. Each ticker gets its own
//! persisted model and scaler; querying a ticker that was never trained is
//! the `NotTrained` error, not an implicit training run.

pub mod dataset;
pub mod scaler;
pub mod store;
pub mod tree;

pub use dataset::Dataset;
pub use scaler::StandardScaler;
pub use store::ModelStore;
pub use tree::{DecisionTree, TreeConfig};

use algolab_core::domain::Bar;
use algolab_core::indicators::IndicatorFrame;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no trained model for '{symbol}'; run training first")]
    NotTrained { symbol: String },

    #[error("not enough usable rows to train '{symbol}' ({rows} after warmup)")]
    NotEnoughData { symbol: String, rows: usize },

    #[error("indicator series '{name}' missing from frame")]
    MissingSeries { name: String },

    #[error("model serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Minimum dataset rows before a fit is worth anything.
const MIN_TRAIN_ROWS: usize = 30;

/// Accuracy on the held-out split, reported after training.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub symbol: String,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
}

/// Next-day call for one ticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub up: bool,
    /// Probability of the up class from the leaf the sample lands in.
    pub prob_up: f64,
}

/// Train a classifier for one ticker and persist model + scaler.
pub fn train_for_ticker(
    symbol: &str,
    bars: &[Bar],
    frame: &IndicatorFrame,
    store: &ModelStore,
    config: &TreeConfig,
) -> Result<TrainReport, ModelError> {
    let dataset = Dataset::from_frame(symbol, bars, frame)?;
    if dataset.len() < MIN_TRAIN_ROWS {
        return Err(ModelError::NotEnoughData {
            symbol: symbol.to_string(),
            rows: dataset.len(),
        });
    }

    let (train, test) = dataset.split(0.2, config.seed);

    let scaler = StandardScaler::fit(&train.features);
    let scaled_train = scaler.transform_all(&train.features);
    let scaled_test = scaler.transform_all(&test.features);

    let mut model = DecisionTree::new(config.clone());
    model.fit(&train.feature_names, &scaled_train, &train.labels);

    let train_accuracy = model.accuracy(&scaled_train, &train.labels);
    let test_accuracy = model.accuracy(&scaled_test, &test.labels);

    store.save(symbol, &model, &scaler)?;

    Ok(TrainReport {
        symbol: symbol.to_string(),
        train_rows: train.len(),
        test_rows: test.len(),
        train_accuracy,
        test_accuracy,
    })
}

/// Predict the next bar's direction from the latest bar of the series.
///
/// Loads the persisted model for the ticker; a missing model is an error.
pub fn predict_next_day(
    symbol: &str,
    bars: &[Bar],
    frame: &IndicatorFrame,
    store: &ModelStore,
) -> Result<Prediction, ModelError> {
    let (model, scaler) = store.load(symbol)?;

    let row = dataset::latest_feature_row(bars, frame).ok_or_else(|| ModelError::NotEnoughData {
        symbol: symbol.to_string(),
        rows: 0,
    })?;
    let scaled = scaler.transform(&row);

    let prob_up = model.predict_proba_one(&scaled);
    Ok(Prediction {
        up: prob_up > 0.5,
        prob_up,
    })
}
