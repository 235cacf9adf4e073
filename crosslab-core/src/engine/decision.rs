//! Position-aware decision rule.
//!
//! A cross is advisory: it is acted upon only when it is consistent with the
//! current position. Every other combination holds.

use crate::domain::PositionStatus;
use crate::signals::Cross;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    EnterLong,
    ExitLong,
    Hold,
}

pub fn decide(cross: Option<Cross>, status: PositionStatus) -> Decision {
    match (cross, status) {
        (Some(Cross::Up), PositionStatus::Flat) => Decision::EnterLong,
        (Some(Cross::Down), PositionStatus::Long) => Decision::ExitLong,
        _ => Decision::Hold,
    }
}
