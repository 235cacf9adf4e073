//! Crossover classification between a short and a long moving average.
//!
//! Signals are market-only: nothing here sees position state. The engine
//! decides whether a cross is acted upon.

pub mod crossover;

pub use crossover::CrossoverDetector;

use serde::{Deserialize, Serialize};

/// Where the short average sits relative to the long one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    Above,
    Below,
    /// Either average is still warming up, or no strict inequality has been seen yet.
    #[default]
    Undefined,
}

impl Relation {
    pub fn is_defined(&self) -> bool {
        !matches!(self, Relation::Undefined)
    }
}

/// A flip between two defined relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cross {
    /// Below → Above (bullish).
    Up,
    /// Above → Below (bearish).
    Down,
}

impl Cross {
    /// The relation this cross lands in.
    pub fn target(&self) -> Relation {
        match self {
            Cross::Up => Relation::Above,
            Cross::Down => Relation::Below,
        }
    }
}
