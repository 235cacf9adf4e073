use chrono::NaiveDate;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::DataIntegrityError;
use crate::engine::tracker::InvalidTransition;

/// Anything that aborts a backtest run. No partial result accompanies it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),

    #[error("invalid position transition at bar {bar_index} ({date}): {source}")]
    Transition {
        bar_index: usize,
        date: NaiveDate,
        #[source]
        source: InvalidTransition,
    },
}
