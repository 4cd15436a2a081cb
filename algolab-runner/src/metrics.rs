//! Equity-curve metrics — pure functions, curve in, scalar out.
//!
//! Trade-level statistics (counts, win ratio, average profit) live on
//! `Summary` in the core crate; this module covers what only the equity
//! curve can answer. Degenerate inputs (empty or one-point curves) yield
//! 0.0, never NaN.

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let initial = equity_curve[0];
    let final_eq = *equity_curve.last().unwrap();
    if initial <= 0.0 {
        return 0.0;
    }
    (final_eq - initial) / initial
}

/// Maximum peak-to-trough drawdown as a positive fraction.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0f64;
    for &eq in equity_curve {
        peak = peak.max(eq);
        if peak > 0.0 {
            worst = worst.max((peak - eq) / peak);
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_return_basic() {
        assert!((total_return(&[100.0, 110.0]) - 0.1).abs() < 1e-12);
        assert_eq!(total_return(&[100.0]), 0.0);
        assert_eq!(total_return(&[]), 0.0);
    }

    #[test]
    fn max_drawdown_finds_worst_trough() {
        let curve = [100.0, 120.0, 90.0, 110.0, 80.0];
        // Peak 120 → trough 80: drawdown = 40/120.
        assert!((max_drawdown(&curve) - 40.0 / 120.0).abs() < 1e-12);
    }

    #[test]
    fn max_drawdown_monotonic_curve_is_zero() {
        assert_eq!(max_drawdown(&[100.0, 101.0, 105.0]), 0.0);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn total_return_never_loses_more_than_everything(
                curve in proptest::collection::vec(1.0f64..1e6, 0..100)
            ) {
                let ret = total_return(&curve);
                prop_assert!(ret >= -1.0);
                prop_assert!(!ret.is_nan());
            }

            #[test]
            fn drawdown_is_a_fraction_for_positive_curves(
                curve in proptest::collection::vec(1.0f64..1e6, 0..100)
            ) {
                let dd = max_drawdown(&curve);
                prop_assert!((0.0..=1.0).contains(&dd));
            }
        }
    }
}
