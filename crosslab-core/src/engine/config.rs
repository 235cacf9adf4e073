//! Strategy parameters for a single run.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Dual moving-average periods, in bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub short_period: usize,
    pub long_period: usize,
}

impl EngineConfig {
    pub const DEFAULT_SHORT_PERIOD: usize = 15;
    pub const DEFAULT_LONG_PERIOD: usize = 30;

    pub fn new(short_period: usize, long_period: usize) -> Self {
        Self {
            short_period,
            long_period,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_period == 0 || self.long_period == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.short_period >= self.long_period {
            return Err(ConfigError::PeriodOrder {
                short: self.short_period,
                long: self.long_period,
            });
        }
        Ok(())
    }

    /// Bars needed before the first cross can be reported: the long average
    /// must be defined on two consecutive bars.
    pub fn min_bars_for_cross(&self) -> usize {
        self.long_period + 1
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SHORT_PERIOD, Self::DEFAULT_LONG_PERIOD)
    }
}
