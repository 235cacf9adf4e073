//! SignalEvent — an emitted BUY or SELL.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalAction {
    Buy,
    Sell,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalAction::Buy => write!(f, "BUY"),
            SignalAction::Sell => write!(f, "SELL"),
        }
    }
}

/// A signal acted upon at `price` (the bar's close) on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub date: NaiveDate,
    pub action: SignalAction,
    pub price: f64,
}

impl SignalEvent {
    pub fn buy(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            action: SignalAction::Buy,
            price,
        }
    }

    pub fn sell(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            action: SignalAction::Sell,
            price,
        }
    }
}

impl fmt::Display for SignalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {} at {}", self.action, self.date, self.price)
    }
}
