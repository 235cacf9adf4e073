//! PositionTracker — guarded flat/long transitions.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Position, Trade};

/// A position command that is not valid in the current state.
///
/// Inside the engine this indicates a logic bug, not bad input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidTransition {
    #[error("cannot enter long on {attempted}: already long since {entry_date}")]
    AlreadyLong {
        entry_date: NaiveDate,
        attempted: NaiveDate,
    },

    #[error("cannot exit long on {attempted}: position is flat")]
    NotLong { attempted: NaiveDate },
}

/// Owns the single position of a run. At most one unit, long only.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    position: Position,
    entry_bar: usize,
    bars_seen: usize,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_flat()
    }

    pub fn is_long(&self) -> bool {
        self.position.is_long()
    }

    /// Advance the bar counter used for `Trade::bars_held`.
    pub(crate) fn mark_bar(&mut self) {
        self.bars_seen += 1;
    }

    pub fn enter_long(&mut self, date: NaiveDate, price: f64) -> Result<(), InvalidTransition> {
        if let Position::Long { entry_date, .. } = self.position {
            return Err(InvalidTransition::AlreadyLong {
                entry_date,
                attempted: date,
            });
        }
        self.position = Position::Long {
            entry_date: date,
            entry_price: price,
        };
        self.entry_bar = self.bars_seen;
        Ok(())
    }

    /// Close the held unit and return the completed round trip.
    pub fn exit_long(&mut self, date: NaiveDate, price: f64) -> Result<Trade, InvalidTransition> {
        let Position::Long {
            entry_date,
            entry_price,
        } = self.position
        else {
            return Err(InvalidTransition::NotLong { attempted: date });
        };
        self.position = Position::Flat;
        Ok(Trade {
            entry_date,
            entry_price,
            exit_date: date,
            exit_price: price,
            bars_held: self.bars_seen.saturating_sub(self.entry_bar),
        })
    }
}
