//! Look-ahead contamination tests.
//!
//! Every indicator must produce the same value at bar t whether or not
//! bars after t exist: computing over a truncated series and truncating
//! the full-series output must agree.

use algolab_core::domain::Bar;
use algolab_core::indicators::{
    Atr, Bollinger, BollingerBand, Ema, Indicator, Macd, MacdLine, Rsi, Sma, WilliamsR,
};
use chrono::NaiveDate;
use proptest::prelude::*;

fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) * 1.01,
                low: open.min(close) * 0.99,
                close,
                volume: 1000,
            }
        })
        .collect()
}

fn indicators_under_test() -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(Rsi::new(14)),
        Box::new(Sma::new(20)),
        Box::new(Sma::new(50)),
        Box::new(Ema::new(12)),
        Box::new(Atr::new(14)),
        Box::new(Bollinger::new(20, 2.0, BollingerBand::Upper)),
        Box::new(Bollinger::new(20, 2.0, BollingerBand::Lower)),
        Box::new(WilliamsR::new(14)),
        Box::new(Macd::new(12, 26, 9).line(MacdLine::Macd)),
        Box::new(Macd::new(12, 26, 9).line(MacdLine::Signal)),
    ]
}

fn assert_prefix_equal(name: &str, full: &[f64], truncated: &[f64]) {
    for i in 0..truncated.len() {
        let (a, b) = (full[i], truncated[i]);
        if a.is_nan() && b.is_nan() {
            continue;
        }
        assert!(
            (a - b).abs() < 1e-12,
            "{name} differs at index {i}: full={a}, truncated={b}"
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn truncation_does_not_change_the_prefix(
        closes in prop::collection::vec(10.0f64..500.0, 40..90),
        cut_frac in 0.3f64..0.95,
    ) {
        let bars = make_bars(&closes);
        let cut = ((bars.len() as f64) * cut_frac) as usize;
        let prefix = &bars[..cut];

        for indicator in indicators_under_test() {
            let full = indicator.compute(&bars);
            let truncated = indicator.compute(prefix);
            prop_assert_eq!(truncated.len(), cut);
            assert_prefix_equal(indicator.name(), &full, &truncated);
        }
    }

    #[test]
    fn recomputation_is_bit_identical(
        closes in prop::collection::vec(10.0f64..500.0, 30..70),
    ) {
        let bars = make_bars(&closes);
        for indicator in indicators_under_test() {
            let a = indicator.compute(&bars);
            let b = indicator.compute(&bars);
            for i in 0..a.len() {
                prop_assert_eq!(a[i].to_bits(), b[i].to_bits());
            }
        }
    }

    #[test]
    fn sma_matches_exact_window_mean(
        closes in prop::collection::vec(1.0f64..1000.0, 25..60),
    ) {
        let bars = make_bars(&closes);
        let period = 20;
        let result = Sma::new(period).compute(&bars);
        for i in 0..bars.len() {
            if i + 1 < period {
                prop_assert!(result[i].is_nan());
            } else {
                let mean: f64 =
                    closes[i + 1 - period..=i].iter().sum::<f64>() / period as f64;
                prop_assert!((result[i] - mean).abs() < 1e-9);
            }
        }
    }
}
