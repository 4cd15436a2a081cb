//! Table builders — shape backtest results into sink-ready rows.

use super::{ReportSink, SinkError};
use crate::metrics::{max_drawdown, total_return};
use algolab_core::backtest::BacktestReport;
use algolab_core::domain::{Signal, Trade};

/// A named table ready to be handed to a [`ReportSink`].
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn write_to(&self, sink: &dyn ReportSink) -> Result<(), SinkError> {
        sink.write_table(&self.name, &self.columns, &self.rows)
    }
}

fn money(v: f64) -> String {
    format!("{v:.2}")
}

/// Per-ticker trade log. The table name carries the ticker so each symbol
/// gets its own file (`{TICKER}_trade_log`).
pub fn trades_table(symbol: &str, trades: &[Trade]) -> Table {
    let rows = trades
        .iter()
        .map(|t| {
            vec![
                t.entry_date.to_string(),
                money(t.entry_price),
                t.exit_date.to_string(),
                money(t.exit_price),
                format!("{:.4}", t.quantity),
                money(t.commission),
                money(t.profit),
            ]
        })
        .collect();
    Table {
        name: format!("{symbol}_trade_log"),
        columns: vec![
            "entry_date",
            "entry_price",
            "exit_date",
            "exit_price",
            "quantity",
            "commission",
            "profit",
        ],
        rows,
    }
}

/// Per-ticker signal series, one row per bar with a non-hold signal.
pub fn signals_table(symbol: &str, signals: &[Signal]) -> Table {
    let rows = signals
        .iter()
        .enumerate()
        .filter(|(_, s)| !matches!(s, Signal::Hold))
        .map(|(i, s)| {
            let label = match s {
                Signal::Buy => "buy",
                Signal::Close => "close",
                Signal::Hold => unreachable!(),
            };
            vec![i.to_string(), label.to_string()]
        })
        .collect();
    Table {
        name: format!("{symbol}_signals"),
        columns: vec!["bar", "signal"],
        rows,
    }
}

/// One summary row per ticker: the trade statistics from `Summary` plus
/// the equity-curve metrics (return and drawdown, both in percent).
pub fn summary_table(reports: &[&BacktestReport]) -> Table {
    let rows = reports
        .iter()
        .map(|r| {
            let s = &r.summary;
            vec![
                r.symbol.clone(),
                s.total_trades.to_string(),
                s.wins.to_string(),
                s.losses.to_string(),
                money(s.total_profit),
                money(s.avg_profit),
                format!("{:.2}", s.win_ratio),
                format!("{:.2}", total_return(&r.equity_curve) * 100.0),
                format!("{:.2}", max_drawdown(&r.equity_curve) * 100.0),
                money(r.final_equity),
            ]
        })
        .collect();
    Table {
        name: "summary".to_string(),
        columns: vec![
            "ticker",
            "total_trades",
            "winning_trades",
            "losing_trades",
            "total_profit",
            "avg_profit",
            "win_ratio_pct",
            "total_return_pct",
            "max_drawdown_pct",
            "final_equity",
        ],
        rows,
    }
}

/// Per-ticker equity curve, one row per bar.
pub fn equity_table(symbol: &str, equity_curve: &[f64]) -> Table {
    let rows = equity_curve
        .iter()
        .enumerate()
        .map(|(i, eq)| vec![i.to_string(), money(*eq)])
        .collect();
    Table {
        name: format!("{symbol}_equity"),
        columns: vec!["bar", "equity"],
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algolab_core::backtest::Summary;
    use chrono::NaiveDate;

    fn blank_report(symbol: &str) -> BacktestReport {
        BacktestReport {
            symbol: symbol.to_string(),
            signals: Vec::new(),
            trades: Vec::new(),
            equity_curve: Vec::new(),
            final_equity: 10_000.0,
            summary: Summary::from_trades(&[]),
        }
    }

    fn sample_trade() -> Trade {
        Trade {
            symbol: "TCS.NS".into(),
            entry_bar: 10,
            entry_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            entry_price: 100.0,
            exit_bar: 15,
            exit_date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            exit_price: 108.0,
            quantity: 10.0,
            commission: 0.4,
            profit: 79.6,
        }
    }

    #[test]
    fn trade_log_is_keyed_by_ticker() {
        let table = trades_table("TCS.NS", &[sample_trade()]);
        assert_eq!(table.name, "TCS.NS_trade_log");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], "2024-03-04");
        assert_eq!(table.rows[0][6], "79.60");
    }

    #[test]
    fn signals_table_skips_hold_bars() {
        let signals = vec![Signal::Hold, Signal::Buy, Signal::Hold, Signal::Close];
        let table = signals_table("X", &signals);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["1".to_string(), "buy".to_string()]);
        assert_eq!(table.rows[1], vec!["3".to_string(), "close".to_string()]);
    }

    #[test]
    fn summary_row_per_ticker() {
        let mut a = blank_report("A");
        a.final_equity = 10_500.0;
        a.equity_curve = vec![10_000.0, 10_800.0, 10_500.0];
        a.summary = Summary {
            total_trades: 2,
            wins: 1,
            losses: 1,
            total_profit: 500.0,
            avg_profit: 250.0,
            win_ratio: 50.0,
        };
        let b = blank_report("B");
        let table = summary_table(&[&a, &b]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], "A");
        assert_eq!(table.rows[0][6], "50.00");
        // Curve metrics: +5% return, 300/10800 drawdown.
        assert_eq!(table.rows[0][7], "5.00");
        assert_eq!(table.rows[0][8], "2.78");
        // Zero trades and an empty curve report 0.0, not NaN.
        assert_eq!(table.rows[1][6], "0.00");
        assert_eq!(table.rows[1][7], "0.00");
        assert_eq!(table.rows[1][8], "0.00");
    }
}
