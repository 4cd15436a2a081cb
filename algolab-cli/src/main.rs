//! AlgoLab CLI — fetch, backtest, and classifier commands.
//!
//! Commands:
//! - `fetch` — download daily bars from Yahoo Finance into the CSV cache
//! - `run` — execute a multi-ticker backtest from a TOML config file
//! - `signals` — print the signal series a rule produces for one ticker
//! - `train` — fit the next-day direction classifier per ticker
//! - `predict` — query a trained classifier for the latest bar

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use algolab_core::data::{
    CsvProvider, DataProvider, FetchProgress, StdoutProgress, YahooProvider,
};
use algolab_core::domain::Signal;
use algolab_core::indicators::standard_frame;
use algolab_core::signals::{signal_series, RsiMaCrossover, RsiThreshold, SignalRule};
use algolab_runner::metrics::{max_drawdown, total_return};
use algolab_runner::model::{self, ModelStore, TreeConfig};
use algolab_runner::report::{signals_table, CsvSink};
use algolab_runner::{run_pipeline, RunConfig};

#[derive(Parser)]
#[command(
    name = "algolab",
    about = "AlgoLab CLI — daily-bar signal backtesting and classification"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily bars from Yahoo Finance into the CSV cache.
    Fetch {
        /// Symbols to fetch (e.g., RELIANCE.NS TCS.NS INFY.NS).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 3 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Data directory for per-symbol CSV files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Execute a multi-ticker backtest from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Read bars from the CSV cache instead of the network.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Data directory for the CSV cache (with --offline).
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Print the signal series a rule produces for one ticker.
    Signals {
        symbol: String,

        /// Start date (YYYY-MM-DD). Defaults to 3 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Rule variant: rsi_ma_crossover or rsi_threshold.
        #[arg(long, default_value = "rsi_ma_crossover")]
        rule: String,

        /// RSI oversold threshold.
        #[arg(long, default_value_t = 30.0)]
        rsi_threshold: f64,

        /// Read bars from the CSV cache instead of the network.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Data directory for the CSV cache (with --offline).
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Also write the signal series as a CSV table to this directory.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fit the next-day direction classifier for each symbol.
    Train {
        /// Symbols to train (e.g., RELIANCE.NS TCS.NS).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 3 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Directory for persisted models and scalers.
        #[arg(long, default_value = "models")]
        model_dir: PathBuf,

        /// Read bars from the CSV cache instead of the network.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Data directory for the CSV cache (with --offline).
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Query a trained classifier for the next-day call on the latest bar.
    Predict {
        symbol: String,

        /// Start date (YYYY-MM-DD). Defaults to 3 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Directory holding persisted models and scalers.
        #[arg(long, default_value = "models")]
        model_dir: PathBuf,

        /// Read bars from the CSV cache instead of the network.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Data directory for the CSV cache (with --offline).
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            symbols,
            start,
            end,
            data_dir,
        } => run_fetch(symbols, start, end, data_dir),
        Commands::Run {
            config,
            offline,
            data_dir,
        } => run_backtest_cmd(&config, offline, data_dir),
        Commands::Signals {
            symbol,
            start,
            end,
            rule,
            rsi_threshold,
            offline,
            data_dir,
            output,
        } => run_signals(
            &symbol,
            start,
            end,
            &rule,
            rsi_threshold,
            offline,
            data_dir,
            output,
        ),
        Commands::Train {
            symbols,
            start,
            end,
            model_dir,
            offline,
            data_dir,
        } => run_train(symbols, start, end, model_dir, offline, data_dir),
        Commands::Predict {
            symbol,
            start,
            end,
            model_dir,
            offline,
            data_dir,
        } => run_predict(&symbol, start, end, model_dir, offline, data_dir),
    }
}

fn parse_range(start: Option<String>, end: Option<String>) -> Result<(NaiveDate, NaiveDate)> {
    let end_date = end
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("invalid --end date, expected YYYY-MM-DD")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let start_date = start
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("invalid --start date, expected YYYY-MM-DD")?
        .unwrap_or_else(|| end_date - chrono::Duration::days(365 * 3));

    if start_date > end_date {
        bail!("start date {start_date} is after end date {end_date}");
    }
    Ok((start_date, end_date))
}

fn build_provider(offline: bool, data_dir: PathBuf) -> Result<Box<dyn DataProvider>> {
    if offline {
        Ok(Box::new(CsvProvider::new(data_dir)))
    } else {
        Ok(Box::new(YahooProvider::new()?))
    }
}

fn run_fetch(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    data_dir: PathBuf,
) -> Result<()> {
    let (start_date, end_date) = parse_range(start, end)?;
    let provider = YahooProvider::new()?;
    let cache = CsvProvider::new(&data_dir);
    let progress = StdoutProgress;

    let total = symbols.len();
    let mut failed = 0;
    for (index, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, index, total);
        match provider.fetch(symbol, start_date, end_date) {
            Ok(bars) => {
                cache.write_bars(symbol, &bars)?;
                progress.on_complete(symbol, index, total, bars.len());
            }
            Err(error) => {
                progress.on_error(symbol, index, total, &error);
                failed += 1;
            }
        }
    }

    println!("Cached under: {}", data_dir.display());
    if failed > 0 {
        eprintln!("{failed} of {total} symbols failed");
        std::process::exit(1);
    }
    Ok(())
}

fn run_backtest_cmd(config_path: &PathBuf, offline: bool, data_dir: PathBuf) -> Result<()> {
    let config = RunConfig::from_toml_file(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    let provider = build_provider(offline, data_dir)?;
    let sink = CsvSink::new(&config.output_dir);

    let outcome = run_pipeline(&config, provider.as_ref(), &sink)?;

    println!();
    println!("=== Run {} ===", &outcome.run_id[..12]);
    println!(
        "{:<14} {:>7} {:>6} {:>7} {:>12} {:>11} {:>8} {:>9} {:>8}",
        "Ticker", "Trades", "Wins", "Losses", "Total P/L", "Avg P/L", "Win %", "Return %", "MaxDD %"
    );
    for result in &outcome.results {
        let s = &result.report.summary;
        let curve = &result.report.equity_curve;
        println!(
            "{:<14} {:>7} {:>6} {:>7} {:>12.2} {:>11.2} {:>8.1} {:>9.2} {:>8.2}",
            result.symbol,
            s.total_trades,
            s.wins,
            s.losses,
            s.total_profit,
            s.avg_profit,
            s.win_ratio,
            total_return(curve) * 100.0,
            max_drawdown(curve) * 100.0
        );
    }
    for (symbol, error) in &outcome.failures {
        eprintln!("{symbol} failed: {error}");
    }
    println!();
    println!("Trade logs written to: {}", config.output_dir.display());

    if outcome.results.is_empty() && !outcome.failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_signals(
    symbol: &str,
    start: Option<String>,
    end: Option<String>,
    rule_name: &str,
    rsi_threshold: f64,
    offline: bool,
    data_dir: PathBuf,
    output: Option<PathBuf>,
) -> Result<()> {
    let (start_date, end_date) = parse_range(start, end)?;
    let rule: Box<dyn SignalRule> = match rule_name {
        "rsi_ma_crossover" => Box::new(RsiMaCrossover::new(rsi_threshold)),
        "rsi_threshold" => Box::new(RsiThreshold::new(rsi_threshold)),
        other => bail!("unknown rule '{other}'. Valid: rsi_ma_crossover, rsi_threshold"),
    };

    let provider = build_provider(offline, data_dir)?;
    let bars = provider.fetch(symbol, start_date, end_date)?;
    let frame = standard_frame(&bars);
    let signals = signal_series(rule.as_ref(), bars.len(), &frame);

    println!("{symbol}: {} bars, rule {}", bars.len(), rule.name());
    let mut fired = 0;
    for (bar, signal) in bars.iter().zip(&signals) {
        match signal {
            Signal::Buy => {
                println!("{}  BUY   close={:.2}", bar.date, bar.close);
                fired += 1;
            }
            Signal::Close => {
                println!("{}  CLOSE close={:.2}", bar.date, bar.close);
                fired += 1;
            }
            Signal::Hold => {}
        }
    }
    if fired == 0 {
        println!("(no buy/close signals in range)");
    }

    if let Some(dir) = output {
        let sink = CsvSink::new(&dir);
        signals_table(symbol, &signals).write_to(&sink)?;
        println!("Signal table written to: {}", dir.display());
    }
    Ok(())
}

fn run_train(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    model_dir: PathBuf,
    offline: bool,
    data_dir: PathBuf,
) -> Result<()> {
    let (start_date, end_date) = parse_range(start, end)?;
    let provider = build_provider(offline, data_dir)?;
    let store = ModelStore::new(&model_dir);
    let tree_config = TreeConfig::default();

    let mut failed = 0;
    for symbol in &symbols {
        let outcome = provider
            .fetch(symbol, start_date, end_date)
            .map_err(anyhow::Error::from)
            .and_then(|bars| {
                let frame = standard_frame(&bars);
                model::train_for_ticker(symbol, &bars, &frame, &store, &tree_config)
                    .map_err(anyhow::Error::from)
            });
        match outcome {
            Ok(report) => {
                println!(
                    "{symbol}: trained on {} rows, held out {} — accuracy {:.1}% train / {:.1}% test",
                    report.train_rows,
                    report.test_rows,
                    report.train_accuracy * 100.0,
                    report.test_accuracy * 100.0
                );
            }
            Err(error) => {
                eprintln!("{symbol} failed: {error}");
                failed += 1;
            }
        }
    }

    println!("Models saved under: {}", model_dir.display());
    if failed == symbols.len() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_predict(
    symbol: &str,
    start: Option<String>,
    end: Option<String>,
    model_dir: PathBuf,
    offline: bool,
    data_dir: PathBuf,
) -> Result<()> {
    let (start_date, end_date) = parse_range(start, end)?;
    let provider = build_provider(offline, data_dir)?;
    let store = ModelStore::new(&model_dir);

    let bars = provider.fetch(symbol, start_date, end_date)?;
    let frame = standard_frame(&bars);
    let prediction = model::predict_next_day(symbol, &bars, &frame, &store)?;

    let Some(last) = bars.last() else {
        bail!("no bars for {symbol} in the requested range");
    };
    let direction = if prediction.up { "UP" } else { "DOWN" };
    println!(
        "{symbol} @ {} (close {:.2}): next day {direction} ({:.1}% up)",
        last.date,
        last.close,
        prediction.prob_up * 100.0
    );
    Ok(())
}
