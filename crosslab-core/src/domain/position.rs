//! Single-instrument, single-unit position state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a unit is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Flat,
    Long,
}

/// Current position. Entry fields exist only while long.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    #[default]
    Flat,
    Long {
        entry_date: NaiveDate,
        entry_price: f64,
    },
}

impl Position {
    pub fn status(&self) -> PositionStatus {
        match self {
            Position::Flat => PositionStatus::Flat,
            Position::Long { .. } => PositionStatus::Long,
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Position::Flat)
    }

    pub fn is_long(&self) -> bool {
        matches!(self, Position::Long { .. })
    }

    pub fn entry_date(&self) -> Option<NaiveDate> {
        match self {
            Position::Long { entry_date, .. } => Some(*entry_date),
            Position::Flat => None,
        }
    }

    pub fn entry_price(&self) -> Option<f64> {
        match self {
            Position::Long { entry_price, .. } => Some(*entry_price),
            Position::Flat => None,
        }
    }

    /// Mark-to-market P&L of the held unit at `price`. Zero when flat.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self {
            Position::Long { entry_price, .. } => price - entry_price,
            Position::Flat => 0.0,
        }
    }
}
