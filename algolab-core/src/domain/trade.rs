//! Trade — a completed round-trip.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A closed round-trip trade: entry → exit.
///
/// Created exactly once per close-position event and immutable afterward.
/// `profit` is net of the recorded `commission` (entry + exit legs):
/// profit = (exit_price − entry_price) × quantity − commission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_bar: usize,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub quantity: f64,
    /// Total commission paid on both legs.
    pub commission: f64,
    /// Net profit after commission.
    pub profit: f64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.profit > 0.0
    }

    /// Return on the trade as a fraction of entry cost.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 || self.quantity == 0.0 {
            return 0.0;
        }
        self.profit / (self.entry_price * self.quantity)
    }

    pub fn bars_held(&self) -> usize {
        self.exit_bar.saturating_sub(self.entry_bar)
    }
}
