//! Indicator engine: trait, precomputed frame, and the concrete indicators.
//!
//! Indicators are pure functions: bar history in, numeric series out. Each
//! series has the same length as the bar series, with `f64::NAN` for the
//! warmup prefix where the lookback window is not yet filled. They are
//! computed once per series and queried by bar index afterwards — never
//! partially updated.
//!
//! # Look-ahead guard
//! No indicator value at bar t may depend on price data from bar t+1 or
//! later. Recomputing over an identical series reproduces identical values.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod williams_r;

pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use macd::{Macd, MacdLine};
pub use rsi::Rsi;
pub use sma::Sma;
pub use williams_r::WilliamsR;

use crate::domain::Bar;
use std::collections::HashMap;

/// Trait for indicators.
///
/// Implementations take a full bar series and produce an output series of
/// the same length, with the first `lookback()` values `f64::NAN`.
pub trait Indicator: Send + Sync {
    /// Series key (e.g., "sma_20", "atr_14").
    fn name(&self) -> &str;

    /// Number of bars consumed before the first valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Container for precomputed indicator series, queried by name and bar index.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Value of a named series at a bar index. `None` when the series or
    /// index does not exist; `NAN` when inside the warmup window.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Series keys of the standard frame.
pub mod keys {
    pub const RSI: &str = "rsi_14";
    pub const SMA_FAST: &str = "sma_20";
    pub const SMA_SLOW: &str = "sma_50";
    pub const MACD: &str = "macd";
    pub const MACD_SIGNAL: &str = "macd_signal";
    pub const ATR: &str = "atr_14";
    pub const BB_UPPER: &str = "bb_upper";
    pub const BB_MIDDLE: &str = "bb_middle";
    pub const BB_LOWER: &str = "bb_lower";
    pub const WILLR: &str = "willr_14";
}

/// Compute the standard indicator frame used by the signal rules, the
/// simulator, and the classifier feature set: RSI(14), SMA(20), SMA(50),
/// MACD(12,26,9), ATR(14), Bollinger(20, 2σ), Williams %R(14).
pub fn standard_frame(bars: &[Bar]) -> IndicatorFrame {
    let mut frame = IndicatorFrame::new();

    frame.insert(keys::RSI, Rsi::new(14).compute(bars));
    frame.insert(keys::SMA_FAST, Sma::new(20).compute(bars));
    frame.insert(keys::SMA_SLOW, Sma::new(50).compute(bars));

    let macd = Macd::new(12, 26, 9);
    frame.insert(keys::MACD, macd.line(MacdLine::Macd).compute(bars));
    frame.insert(keys::MACD_SIGNAL, macd.line(MacdLine::Signal).compute(bars));

    frame.insert(keys::ATR, Atr::new(14).compute(bars));

    frame.insert(
        keys::BB_UPPER,
        Bollinger::new(20, 2.0, BollingerBand::Upper).compute(bars),
    );
    frame.insert(
        keys::BB_MIDDLE,
        Bollinger::new(20, 2.0, BollingerBand::Middle).compute(bars),
    );
    frame.insert(
        keys::BB_LOWER,
        Bollinger::new(20, 2.0, BollingerBand::Lower).compute(bars),
    );

    frame.insert(keys::WILLR, WilliamsR::new(14).compute(bars));

    frame
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
