//! Batch pipeline: fetch → indicators → signals → backtest → report.
//!
//! Tickers are processed in parallel and isolated from each other: one
//! ticker failing (no data, network error, sink hiccup) is recorded in the
//! outcome and the rest of the batch carries on. The pipeline itself only
//! errors when the run as a whole cannot proceed, such as an invalid
//! configuration or a failed summary write.

use crate::config::{ConfigError, RunConfig, RunId};
use crate::model::ModelError;
use crate::report::{
    equity_table, signals_table, summary_table, trades_table, ReportSink, SinkError,
};
use algolab_core::backtest::{run_backtest, BacktestReport};
use algolab_core::data::{DataError, DataProvider};
use algolab_core::indicators::standard_frame;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// One ticker's completed pass through the pipeline.
#[derive(Debug, Clone)]
pub struct TickerResult {
    pub symbol: String,
    pub report: BacktestReport,
}

/// Aggregate outcome of one batch run. `failures` carries the tickers that
/// errored; their presence never aborts the batch.
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub results: Vec<TickerResult>,
    pub failures: Vec<(String, RunError)>,
}

impl RunOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run the full batch: every configured ticker through fetch, the standard
/// indicator frame, the configured rule, and the simulator; then write the
/// per-ticker trade log, signal, and equity tables and the cross-ticker
/// summary through the sink.
pub fn run_pipeline(
    config: &RunConfig,
    provider: &dyn DataProvider,
    sink: &dyn ReportSink,
) -> Result<RunOutcome, RunError> {
    config.validate()?;
    let sim_config = config.sim_config();

    let simulated: Vec<(String, Result<BacktestReport, RunError>)> = config
        .tickers
        .par_iter()
        .map(|symbol| {
            let outcome = simulate_ticker(symbol, config, provider, &sim_config);
            (symbol.clone(), outcome)
        })
        .collect();

    let mut results = Vec::new();
    let mut failures = Vec::new();
    for (symbol, outcome) in simulated {
        match outcome {
            Ok(report) => results.push(TickerResult { symbol, report }),
            Err(error) => failures.push((symbol, error)),
        }
    }

    // Per-ticker table writes: a sink failure moves the ticker to the
    // failure list instead of dropping the batch.
    let mut written = Vec::new();
    for result in results {
        let tables = [
            trades_table(&result.symbol, &result.report.trades),
            signals_table(&result.symbol, &result.report.signals),
            equity_table(&result.symbol, &result.report.equity_curve),
        ];
        match tables.iter().try_for_each(|t| t.write_to(sink)) {
            Ok(()) => written.push(result),
            Err(error) => failures.push((result.symbol, RunError::Sink(error))),
        }
    }

    let reports: Vec<&BacktestReport> = written.iter().map(|r| &r.report).collect();
    summary_table(&reports).write_to(sink)?;

    Ok(RunOutcome {
        run_id: config.run_id(),
        results: written,
        failures,
    })
}

fn simulate_ticker(
    symbol: &str,
    config: &RunConfig,
    provider: &dyn DataProvider,
    sim_config: &algolab_core::backtest::SimConfig,
) -> Result<BacktestReport, RunError> {
    let bars = provider.fetch(symbol, config.start_date, config.end_date)?;
    let frame = standard_frame(&bars);
    let rule = config.build_rule();
    let mut report = run_backtest(&bars, &frame, rule.as_ref(), sim_config);
    // An empty fetch yields an empty report with no symbol on it.
    if report.symbol.is_empty() {
        report.symbol = symbol.to_string();
    }
    Ok(report)
}
