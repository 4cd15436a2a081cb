//! Backtest simulator — a {Flat, Long} state machine folded over bars.
//!
//! The simulator replays the bar series in date order, applies a signal
//! rule's proposals, and tracks a single-position portfolio: cash, at most
//! one open long, commission on both legs. Output is the trade list, the
//! per-bar equity curve, and summary statistics.
//!
//! Look-ahead invariant: the decision at bar i uses only data up to and
//! including bar i. Under the default next-bar-open fill policy the fill
//! price comes from bar i+1, but that is the execution of a decision
//! already made — the decision itself never sees bar i+1.

pub mod summary;

pub use summary::Summary;

use crate::domain::{Bar, Position, Signal, Trade};
use crate::indicators::IndicatorFrame;
use crate::signals::{signal_series, SignalRule};
use serde::{Deserialize, Serialize};

/// When a proposed order is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Fill at the open of the bar after the signal bar.
    #[default]
    NextBarOpen,
    /// Fill at the close of the signal bar itself.
    SameBarClose,
}

/// Simulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub initial_cash: f64,
    /// Commission as a fraction of traded notional, charged on each leg.
    pub commission: f64,
    pub fill_policy: FillPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_cash: 10_000.0,
            commission: 0.002,
            fill_policy: FillPolicy::NextBarOpen,
        }
    }
}

/// Complete result of one simulated series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub symbol: String,
    pub signals: Vec<Signal>,
    pub trades: Vec<Trade>,
    /// Cash plus mark-to-market of any open position, at each bar's close.
    pub equity_curve: Vec<f64>,
    pub final_equity: f64,
    pub summary: Summary,
}

impl BacktestReport {
    /// An empty-but-valid report: no bars, no trades, capital untouched.
    /// Callers distinguish "no trades executed" from a failed run by the
    /// `Result` wrapping, not by peeking at this.
    fn empty(symbol: &str, initial_cash: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            signals: Vec::new(),
            trades: Vec::new(),
            equity_curve: Vec::new(),
            final_equity: initial_cash,
            summary: Summary::from_trades(&[]),
        }
    }
}

/// A long position plus the entry-leg commission still to be attributed to
/// the eventual trade record.
#[derive(Debug, Clone)]
struct OpenLot {
    position: Position,
    entry_commission: f64,
}

/// Order queued at decision time, filled at the next bar's open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOrder {
    Open,
    Close,
}

/// Run the simulator over one ticker's bar series.
///
/// The signal series is computed up front (signals depend only on the
/// indicator frame and the rule's own fold state, never on the portfolio),
/// then the position fold replays it bar by bar.
pub fn run_backtest(
    bars: &[Bar],
    frame: &IndicatorFrame,
    rule: &dyn SignalRule,
    config: &SimConfig,
) -> BacktestReport {
    let symbol = bars.first().map(|b| b.symbol.as_str()).unwrap_or("");

    if bars.is_empty() {
        return BacktestReport::empty(symbol, config.initial_cash);
    }

    let signals = signal_series(rule, bars.len(), frame);

    let mut cash = config.initial_cash;
    let mut open: Option<OpenLot> = None;
    let mut pending: Option<PendingOrder> = None;
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity_curve: Vec<f64> = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        // Phase 1: fill the order queued on the previous bar.
        if config.fill_policy == FillPolicy::NextBarOpen {
            if let Some(order) = pending.take() {
                apply_order(
                    order, bar.open, i, bar, config, &mut cash, &mut open, &mut trades,
                );
            }
        }

        // Phase 2: decide. Exclusivity is enforced here: a buy needs a flat
        // book and a close needs an open position; everything else is a
        // no-op. One order per bar.
        let order = match (signals[i], &open) {
            (Signal::Buy, None) => Some(PendingOrder::Open),
            (Signal::Close, Some(_)) => Some(PendingOrder::Close),
            _ => None,
        };

        if let Some(order) = order {
            match config.fill_policy {
                FillPolicy::NextBarOpen => pending = Some(order),
                FillPolicy::SameBarClose => {
                    apply_order(
                        order, bar.close, i, bar, config, &mut cash, &mut open, &mut trades,
                    );
                }
            }
        }

        // Phase 3: mark equity at the close.
        let marked = cash
            + open
                .as_ref()
                .map(|lot| lot.position.market_value(bar.close))
                .unwrap_or(0.0);
        equity_curve.push(marked);
    }

    // A position still open at the end of data is closed at the final close
    // so every trade's lifecycle is accounted for.
    if open.is_some() {
        let last = bars.len() - 1;
        apply_order(
            PendingOrder::Close,
            bars[last].close,
            last,
            &bars[last],
            config,
            &mut cash,
            &mut open,
            &mut trades,
        );
        if let Some(eq) = equity_curve.last_mut() {
            *eq = cash;
        }
    }

    let final_equity = cash;
    let summary = Summary::from_trades(&trades);

    BacktestReport {
        symbol: symbol.to_string(),
        signals,
        trades,
        equity_curve,
        final_equity,
        summary,
    }
}

/// Execute one order at the given fill price, mutating the fold state.
#[allow(clippy::too_many_arguments)]
fn apply_order(
    order: PendingOrder,
    fill_price: f64,
    bar_index: usize,
    bar: &Bar,
    config: &SimConfig,
    cash: &mut f64,
    open: &mut Option<OpenLot>,
    trades: &mut Vec<Trade>,
) {
    if fill_price.is_nan() || fill_price <= 0.0 {
        return; // void bar: the order is dropped
    }

    match order {
        PendingOrder::Open => {
            if open.is_some() || *cash <= 0.0 {
                return;
            }
            // Size on full cash, commission included in the outlay.
            let quantity = *cash / (fill_price * (1.0 + config.commission));
            let entry_commission = quantity * fill_price * config.commission;
            *cash -= quantity * fill_price + entry_commission;
            *open = Some(OpenLot {
                position: Position {
                    entry_bar: bar_index,
                    entry_date: bar.date,
                    entry_price: fill_price,
                    quantity,
                },
                entry_commission,
            });
        }
        PendingOrder::Close => {
            let Some(lot) = open.take() else {
                return;
            };
            let proceeds = lot.position.quantity * fill_price;
            let exit_commission = proceeds * config.commission;
            *cash += proceeds - exit_commission;

            let commission = lot.entry_commission + exit_commission;
            let profit =
                (fill_price - lot.position.entry_price) * lot.position.quantity - commission;
            trades.push(Trade {
                symbol: bar.symbol.clone(),
                entry_bar: lot.position.entry_bar,
                entry_date: lot.position.entry_date,
                entry_price: lot.position.entry_price,
                exit_bar: bar_index,
                exit_date: bar.date,
                exit_price: fill_price,
                quantity: lot.position.quantity,
                commission,
                profit,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{keys, make_bars, IndicatorFrame};
    use crate::signals::RsiMaCrossover;

    /// Frame fabricated so the crossover rule buys at `buy_bar` and closes
    /// at `close_bar` (both must be >= 1).
    fn scripted_frame(n: usize, buy_bar: usize, close_bar: usize) -> IndicatorFrame {
        let mut rsi = vec![50.0; n];
        let mut fast = vec![90.0; n];
        let slow = vec![100.0; n];

        rsi[buy_bar - 1] = 20.0; // arm the bar before the cross
        for v in fast.iter_mut().take(close_bar).skip(buy_bar) {
            *v = 110.0; // fast above slow between the two crosses
        }

        let mut frame = IndicatorFrame::new();
        frame.insert(keys::RSI, rsi);
        frame.insert(keys::SMA_FAST, fast);
        frame.insert(keys::SMA_SLOW, slow);
        frame
    }

    fn no_commission(fill_policy: FillPolicy) -> SimConfig {
        SimConfig {
            initial_cash: 100.0,
            commission: 0.0,
            fill_policy,
        }
    }

    #[test]
    fn empty_series_is_valid_and_empty() {
        let frame = IndicatorFrame::new();
        let rule = RsiMaCrossover::default();
        let report = run_backtest(&[], &frame, &rule, &SimConfig::default());
        assert!(report.trades.is_empty());
        assert!(report.equity_curve.is_empty());
        assert_eq!(report.final_equity, 10_000.0);
        assert_eq!(report.summary.total_trades, 0);
        assert_eq!(report.summary.win_ratio, 0.0);
    }

    #[test]
    fn short_series_produces_no_trades() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let frame = crate::indicators::standard_frame(&bars);
        let rule = RsiMaCrossover::default();
        let report = run_backtest(&bars, &frame, &rule, &SimConfig::default());
        assert!(report.trades.is_empty());
        assert_eq!(report.equity_curve.len(), 3);
    }

    #[test]
    fn round_trip_next_bar_open() {
        // Buy signal at bar 5 → fill at bar 6 open; close at bar 10 → fill
        // at bar 11 open.
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let frame = scripted_frame(15, 5, 10);
        let rule = RsiMaCrossover::default();
        let report = run_backtest(&bars, &frame, &rule, &no_commission(FillPolicy::NextBarOpen));

        assert_eq!(report.trades.len(), 1);
        let trade = &report.trades[0];
        assert_eq!(trade.entry_bar, 6);
        assert_eq!(trade.exit_bar, 11);
        assert_eq!(trade.entry_price, bars[6].open);
        assert_eq!(trade.exit_price, bars[11].open);
        // With zero commission, profit = (exit - entry) * qty exactly.
        let expected = (trade.exit_price - trade.entry_price) * trade.quantity;
        assert!((trade.profit - expected).abs() < 1e-10);
        assert!((report.final_equity - (100.0 + trade.profit)).abs() < 1e-10);
    }

    #[test]
    fn round_trip_same_bar_close() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let frame = scripted_frame(15, 5, 10);
        let rule = RsiMaCrossover::default();
        let report = run_backtest(&bars, &frame, &rule, &no_commission(FillPolicy::SameBarClose));

        assert_eq!(report.trades.len(), 1);
        let trade = &report.trades[0];
        assert_eq!(trade.entry_bar, 5);
        assert_eq!(trade.exit_bar, 10);
        assert_eq!(trade.entry_price, bars[5].close);
        assert_eq!(trade.exit_price, bars[10].close);
    }

    #[test]
    fn commission_charged_on_both_legs() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let frame = scripted_frame(15, 5, 10);
        let rule = RsiMaCrossover::default();
        let config = SimConfig {
            initial_cash: 1000.0,
            commission: 0.002,
            fill_policy: FillPolicy::NextBarOpen,
        };
        let report = run_backtest(&bars, &frame, &rule, &config);

        assert_eq!(report.trades.len(), 1);
        let trade = &report.trades[0];
        let entry_commission = trade.quantity * trade.entry_price * 0.002;
        let exit_commission = trade.quantity * trade.exit_price * 0.002;
        assert!((trade.commission - (entry_commission + exit_commission)).abs() < 1e-10);
        // Net profit identity of the Trade record.
        let expected =
            (trade.exit_price - trade.entry_price) * trade.quantity - trade.commission;
        assert!((trade.profit - expected).abs() < 1e-10);
        // Cash accounting is consistent with the trade record.
        assert!((report.final_equity - (1000.0 + trade.profit)).abs() < 1e-10);
    }

    #[test]
    fn open_position_is_closed_at_series_end() {
        // Buy fires but no death cross follows.
        let closes: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let frame = scripted_frame(12, 5, 12); // close_bar beyond the series
        let rule = RsiMaCrossover::default();
        let report = run_backtest(&bars, &frame, &rule, &no_commission(FillPolicy::NextBarOpen));

        assert_eq!(report.trades.len(), 1);
        let trade = &report.trades[0];
        assert_eq!(trade.exit_bar, 11);
        assert_eq!(trade.exit_price, bars[11].close);
        // Final equity equals the last equity point after the forced close.
        assert!((report.final_equity - report.equity_curve[11]).abs() < 1e-10);
    }

    #[test]
    fn buy_on_last_bar_never_fills() {
        let closes: Vec<f64> = (0..6).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let frame = scripted_frame(6, 5, 6);
        let rule = RsiMaCrossover::default();
        let report = run_backtest(&bars, &frame, &rule, &no_commission(FillPolicy::NextBarOpen));
        assert!(report.trades.is_empty());
        assert_eq!(report.final_equity, 100.0);
    }

    #[test]
    fn equity_curve_marks_open_position_to_market() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let frame = scripted_frame(15, 5, 10);
        let rule = RsiMaCrossover::default();
        let report = run_backtest(&bars, &frame, &rule, &no_commission(FillPolicy::NextBarOpen));

        assert_eq!(report.equity_curve.len(), 15);
        // While long (bars 6..=10), equity moves with the close.
        let trade = &report.trades[0];
        let eq8 = trade.quantity * bars[8].close;
        assert!((report.equity_curve[8] - eq8).abs() < 1e-9);
        // Before entry, equity is flat at initial cash.
        assert!((report.equity_curve[3] - 100.0).abs() < 1e-10);
    }

    #[test]
    fn no_buy_while_long_no_close_while_flat() {
        // Frame scripts two consecutive buy crossovers with no close between.
        let n = 20;
        let mut rsi = vec![50.0; n];
        let mut fast = vec![90.0; n];
        let slow = vec![100.0; n];
        // First cross at 5 (armed at 4), dip again at 7, cross again at 9
        // after fast dips under slow at 8.
        rsi[4] = 20.0;
        rsi[7] = 20.0;
        fast[5] = 110.0;
        fast[6] = 110.0;
        fast[7] = 110.0;
        fast[8] = 90.0;
        for v in fast.iter_mut().take(n).skip(9) {
            *v = 110.0;
        }
        let mut frame = IndicatorFrame::new();
        frame.insert(keys::RSI, rsi);
        frame.insert(keys::SMA_FAST, fast);
        frame.insert(keys::SMA_SLOW, slow);

        let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let rule = RsiMaCrossover::default();
        let report = run_backtest(&bars, &frame, &rule, &no_commission(FillPolicy::NextBarOpen));

        // The death cross at bar 8 closes the first trade; the second cross
        // at bar 9 reopens. Never two opens without a close between them.
        let mut open_count = 0i32;
        for trade in &report.trades {
            assert!(trade.exit_bar >= trade.entry_bar);
            open_count += 1;
        }
        assert!(open_count >= 1);
        for pair in report.trades.windows(2) {
            assert!(pair[1].entry_bar >= pair[0].exit_bar);
        }
    }
}
