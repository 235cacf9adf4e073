//! Trade — a completed long round trip.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One unit bought at `entry_price` and sold at `exit_price`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub bars_held: usize,
}

impl Trade {
    pub fn pnl(&self) -> f64 {
        self.exit_price - self.entry_price
    }

    /// Return as a fraction of entry price.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        self.pnl() / self.entry_price
    }

    pub fn is_winner(&self) -> bool {
        self.pnl() > 0.0
    }
}
