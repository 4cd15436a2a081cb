//! CSV bar import — the offline data path.
//!
//! One file per symbol under a data directory (`{SYMBOL}.csv`), with the
//! header `date,open,high,low,close,volume` and ISO dates. This is also the
//! format the `fetch` CLI command writes, so a fetch-once/run-many workflow
//! needs no network after the first download.

use super::provider::{validate_series, DataError, DataProvider};
use crate::domain::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Reads bars from per-symbol CSV files in a directory.
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    /// Write a bar series to the per-symbol file, replacing any previous
    /// contents. Used by the fetch command to populate the cache.
    pub fn write_bars(&self, symbol: &str, bars: &[Bar]) -> Result<(), DataError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(symbol);
        let mut writer = csv::Writer::from_path(&path).map_err(|e| DataError::Csv(e.to_string()))?;
        for bar in bars {
            let row = CsvRow {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            };
            writer
                .serialize(row)
                .map_err(|e| DataError::Csv(e.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read_bars(&self, symbol: &str, path: &Path) -> Result<Vec<Bar>, DataError> {
        let mut reader =
            csv::Reader::from_path(path).map_err(|e| DataError::Csv(e.to_string()))?;
        let mut bars = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|e| DataError::Csv(e.to_string()))?;
            bars.push(Bar {
                symbol: symbol.to_string(),
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }
        Ok(bars)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let mut bars = self.read_bars(symbol, &path)?;
        bars.retain(|b| b.date >= start && b.date <= end);

        if bars.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }

        validate_series(symbol, &bars)?;
        Ok(bars)
    }
}
