//! Open position state inside the simulator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single open long position.
///
/// The simulator holds at most one of these at any time (exclusivity
/// invariant): a position is opened only while flat and closed only while
/// long.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub quantity: f64,
}

impl Position {
    pub fn market_value(&self, current_price: f64) -> f64 {
        self.quantity * current_price
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.quantity * (current_price - self.entry_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrealized_pnl_marks_to_market() {
        let pos = Position {
            entry_bar: 3,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            entry_price: 100.0,
            quantity: 2.5,
        };
        assert!((pos.unrealized_pnl(110.0) - 25.0).abs() < 1e-12);
        assert!((pos.market_value(110.0) - 275.0).abs() < 1e-12);
    }
}
