//! On-disk persistence for trained models.
//!
//! Each ticker owns two JSON blobs in the store directory:
//! `{symbol}_model.json` (the tree) and `{symbol}_scaler.json` (the fitted
//! scaler). Saving overwrites both; loading a ticker with no saved model
//! is the `NotTrained` error.

use super::{DecisionTree, ModelError, StandardScaler};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}_model.json"))
    }

    pub fn scaler_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}_scaler.json"))
    }

    pub fn is_trained(&self, symbol: &str) -> bool {
        self.model_path(symbol).is_file() && self.scaler_path(symbol).is_file()
    }

    pub fn save(
        &self,
        symbol: &str,
        model: &DecisionTree,
        scaler: &StandardScaler,
    ) -> Result<(), ModelError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.model_path(symbol), serde_json::to_vec_pretty(model)?)?;
        std::fs::write(self.scaler_path(symbol), serde_json::to_vec_pretty(scaler)?)?;
        Ok(())
    }

    pub fn load(&self, symbol: &str) -> Result<(DecisionTree, StandardScaler), ModelError> {
        if !self.is_trained(symbol) {
            return Err(ModelError::NotTrained {
                symbol: symbol.to_string(),
            });
        }
        let model = serde_json::from_slice(&std::fs::read(self.model_path(symbol))?)?;
        let scaler = serde_json::from_slice(&std::fs::read(self.scaler_path(symbol))?)?;
        Ok((model, scaler))
    }
}
