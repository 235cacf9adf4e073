//! Serializable run configuration (TOML).
//!
//! A `RunConfig` captures everything needed to reproduce a backtest: the
//! symbol, the `[start, end)` date window, the strategy periods and where the
//! bars come from.
//!
//! ```toml
//! symbol = "BBVA.MC"
//! start_date = "2024-01-01"
//! end_date = "2024-12-31"
//!
//! [strategy]
//! short_period = 15
//! long_period = 30
//!
//! [data]
//! type = "CSV"
//! path = "data/bbva.csv"
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::synthetic::SyntheticKind;
use crate::engine::EngineConfig;

/// Invalid engine or run configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("moving average period must be at least 1")]
    ZeroPeriod,

    #[error("short period ({short}) must be less than long period ({long})")]
    PeriodOrder { short: usize, long: usize },

    #[error("start date {start} must be before end date {end}")]
    DateRange { start: NaiveDate, end: NaiveDate },

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("failed to read config {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Where a run's bars come from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataConfig {
    /// Yahoo Finance daily chart API.
    #[default]
    Yahoo,

    /// CSV file with Date/Open/High/Low/Close/Volume columns.
    Csv { path: PathBuf },

    /// Deterministic generated series (offline demos and tests).
    Synthetic {
        kind: SyntheticKind,
        #[serde(default = "default_synthetic_bars")]
        bars: usize,
        #[serde(default)]
        seed: u64,
    },
}

/// Bars generated when a synthetic source does not say how many.
pub const DEFAULT_SYNTHETIC_BARS: usize = 250;

fn default_synthetic_bars() -> usize {
    DEFAULT_SYNTHETIC_BARS
}

/// Full configuration of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub symbol: String,

    /// First date included.
    pub start_date: NaiveDate,

    /// First date excluded.
    pub end_date: NaiveDate,

    #[serde(default)]
    pub strategy: EngineConfig,

    #[serde(default)]
    pub data: DataConfig,
}

impl RunConfig {
    pub fn new(symbol: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            start_date,
            end_date,
            strategy: EngineConfig::default(),
            data: DataConfig::default(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if self.start_date >= self.end_date {
            return Err(ConfigError::DateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        self.strategy.validate()
    }

    /// Deterministic content hash of this configuration.
    ///
    /// Two identical configs share a run id, so artifacts can be matched to
    /// the exact inputs that produced them.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
