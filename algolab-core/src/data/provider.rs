//! Data provider trait and structured error types.
//!
//! The `DataProvider` trait abstracts over data sources (Yahoo Finance
//! chart API, CSV import) so implementations can be swapped and mocked in
//! tests. Providers return bars sorted ascending by date with no duplicate
//! dates; `validate_series` enforces that contract centrally.
//!
//! No retries: a transient failure surfaces immediately as an error for
//! that operation, and the caller decides whether the ticker is skipped.

use crate::domain::Bar;
use chrono::NaiveDate;
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Ticker has no rows in the requested range. Recoverable: callers
    /// treat it as an empty result, not a crash.
    #[error("no data for symbol '{symbol}' in the requested range")]
    NoData { symbol: String },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("response format changed: {0}")]
    BadResponse(String),

    #[error("bars for '{symbol}' are not ascending by date at {date}")]
    UnsortedDates { symbol: String, date: NaiveDate },

    #[error("duplicate date {date} for '{symbol}'")]
    DuplicateDate { symbol: String, date: NaiveDate },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for data providers.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a symbol over an inclusive date range,
    /// ascending by date.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Bar>, DataError>;
}

/// Check the ordering contract: strictly ascending dates, no duplicates.
pub fn validate_series(symbol: &str, bars: &[Bar]) -> Result<(), DataError> {
    for pair in bars.windows(2) {
        if pair[1].date == pair[0].date {
            return Err(DataError::DuplicateDate {
                symbol: symbol.to_string(),
                date: pair[1].date,
            });
        }
        if pair[1].date < pair[0].date {
            return Err(DataError::UnsortedDates {
                symbol: symbol.to_string(),
                date: pair[1].date,
            });
        }
    }
    Ok(())
}

/// Progress callback for multi-symbol fetches.
pub trait FetchProgress: Send {
    fn on_start(&self, symbol: &str, index: usize, total: usize);
    fn on_complete(&self, symbol: &str, index: usize, total: usize, bars: usize);
    fn on_error(&self, symbol: &str, index: usize, total: usize, error: &DataError);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {symbol}...", index + 1, total);
    }

    fn on_complete(&self, symbol: &str, index: usize, total: usize, bars: usize) {
        println!("[{}/{}] {symbol}: {bars} bars", index + 1, total);
    }

    fn on_error(&self, symbol: &str, index: usize, total: usize, error: &DataError) {
        println!("[{}/{}] {symbol} failed: {error}", index + 1, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: NaiveDate) -> Bar {
        Bar {
            symbol: "TEST".into(),
            date,
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.5,
            volume: 1000,
        }
    }

    #[test]
    fn validate_accepts_ascending() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let bars = vec![bar(d(2)), bar(d(3)), bar(d(5))];
        assert!(validate_series("TEST", &bars).is_ok());
    }

    #[test]
    fn validate_rejects_duplicates() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let bars = vec![bar(d(2)), bar(d(2))];
        assert!(matches!(
            validate_series("TEST", &bars),
            Err(DataError::DuplicateDate { .. })
        ));
    }

    #[test]
    fn validate_rejects_descending() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let bars = vec![bar(d(5)), bar(d(2))];
        assert!(matches!(
            validate_series("TEST", &bars),
            Err(DataError::UnsortedDates { .. })
        ));
    }
}
