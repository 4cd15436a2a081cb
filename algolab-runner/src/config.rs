//! Serializable run configuration.

use algolab_core::backtest::{FillPolicy, SimConfig};
use algolab_core::signals::{RsiMaCrossover, RsiThreshold, SignalRule};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Unique identifier for a run (content-addressable hash of the config).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("no tickers configured")]
    NoTickers,
}

/// Which signal rule variant a run uses.
///
/// The two variants are deliberately distinct (see the signals module) and
/// selecting one here is the only way to switch between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// RSI dip arms a later SMA20/SMA50 golden-cross buy. Canonical.
    #[default]
    RsiMaCrossover,
    /// Buy whenever RSI is below the threshold.
    RsiThreshold,
}

/// Configuration for one batch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub tickers: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[serde(default)]
    pub rule: RuleKind,
    #[serde(default = "default_rsi_threshold")]
    pub rsi_threshold: f64,

    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,
    #[serde(default = "default_commission")]
    pub commission: f64,
    #[serde(default)]
    pub fill_policy: FillPolicy,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_rsi_threshold() -> f64 {
    30.0
}

fn default_initial_cash() -> f64 {
    10_000.0
}

fn default_commission() -> f64 {
    0.002
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("trade_logs")
}

impl RunConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::NoTickers);
        }
        if self.start_date > self.end_date {
            return Err(ConfigError::InvertedRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Deterministic hash id: identical configs share artifacts.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Build the configured signal rule.
    pub fn build_rule(&self) -> Box<dyn SignalRule> {
        match self.rule {
            RuleKind::RsiMaCrossover => Box::new(RsiMaCrossover::new(self.rsi_threshold)),
            RuleKind::RsiThreshold => Box::new(RsiThreshold::new(self.rsi_threshold)),
        }
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            initial_cash: self.initial_cash,
            commission: self.commission,
            fill_policy: self.fill_policy,
        }
    }
}
