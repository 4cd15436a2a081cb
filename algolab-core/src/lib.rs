//! AlgoLab Core — domain types, indicators, signal rules, and the backtest simulator.
//!
//! This crate contains the computational heart of the system:
//! - Domain types (bars, positions, trades, signals)
//! - Indicator engine: RSI, SMA, EMA, MACD, ATR, Bollinger Bands, Williams %R
//! - Signal rules (RSI threshold, RSI-armed MA crossover)
//! - Single-position backtest simulator with equity curve and summary stats
//! - Market data providers (Yahoo Finance chart API, CSV import)

pub mod backtest;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod signals;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: core types are Send + Sync so ticker pipelines
    /// can fan out across worker threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Trade>();
        require_sync::<domain::Trade>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();

        require_send::<indicators::IndicatorFrame>();
        require_sync::<indicators::IndicatorFrame>();

        require_send::<backtest::BacktestReport>();
        require_sync::<backtest::BacktestReport>();
        require_send::<backtest::SimConfig>();
        require_sync::<backtest::SimConfig>();

        require_send::<data::DataError>();
        require_sync::<data::DataError>();
    }
}
