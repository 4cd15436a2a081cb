//! Summary statistics over a trade list.

use crate::domain::Trade;
use serde::{Deserialize, Serialize};

/// Aggregate trade statistics for one simulated series.
///
/// `win_ratio` is wins / total × 100, defined as 0.0 when there are no
/// trades (never NaN).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_profit: f64,
    pub avg_profit: f64,
    pub win_ratio: f64,
}

impl Summary {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let total_trades = trades.len();
        let wins = trades.iter().filter(|t| t.is_winner()).count();
        let losses = total_trades - wins;
        let total_profit: f64 = trades.iter().map(|t| t.profit).sum();

        let (avg_profit, win_ratio) = if total_trades == 0 {
            (0.0, 0.0)
        } else {
            (
                total_profit / total_trades as f64,
                wins as f64 / total_trades as f64 * 100.0,
            )
        };

        Self {
            total_trades,
            wins,
            losses,
            total_profit,
            avg_profit,
            win_ratio,
        }
    }
}
