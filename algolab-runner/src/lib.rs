//! AlgoLab Runner — per-ticker pipeline orchestration.
//!
//! Wires the core engine into a batch workflow: load a TOML run
//! configuration, fan out over tickers (fetch → indicators → signals →
//! backtest), aggregate summary metrics, write report tables through a
//! sink, and train/query the next-day direction classifier.

pub mod config;
pub mod metrics;
pub mod model;
pub mod report;
pub mod runner;

pub use config::{RuleKind, RunConfig};
pub use runner::{run_pipeline, RunError, RunOutcome, TickerResult};
