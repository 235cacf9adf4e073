//! Per-run mutable state and the per-bar trace.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::{PositionStatus, PriceBar, SignalAction, Trade};
use crate::engine::config::EngineConfig;
use crate::engine::signal_log::SignalLog;
use crate::engine::tracker::PositionTracker;
use crate::indicators::Sma;
use crate::signals::{CrossoverDetector, Relation};

/// Everything the chart layer needs for one bar.
///
/// Averages are `None` during warm-up and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSnapshot {
    pub bar: PriceBar,
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
    pub relation: Relation,
    /// Position after this bar's decision.
    pub position: PositionStatus,
    /// Single-unit equity: realized P&L plus mark-to-market of the open unit.
    pub equity: f64,
    /// Signal emitted on this bar, if any.
    pub signal: Option<SignalAction>,
}

/// State that evolves bar-by-bar during one run.
///
/// Created fresh for every run and consumed into the result; nothing in it is
/// shared between runs.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub(crate) short: Sma,
    pub(crate) long: Sma,
    pub(crate) detector: CrossoverDetector,
    pub(crate) tracker: PositionTracker,
    pub(crate) log: SignalLog,
    pub(crate) trace: Vec<BarSnapshot>,
    pub(crate) trades: Vec<Trade>,
    pub(crate) realized_pnl: f64,
    pub(crate) bar_index: usize,
    pub(crate) last_date: Option<NaiveDate>,
}

impl EngineState {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            short: Sma::new(config.short_period)?,
            long: Sma::new(config.long_period)?,
            detector: CrossoverDetector::new(),
            tracker: PositionTracker::new(),
            log: SignalLog::new(),
            trace: Vec::new(),
            trades: Vec::new(),
            realized_pnl: 0.0,
            bar_index: 0,
            last_date: None,
        })
    }

    pub fn bar_index(&self) -> usize {
        self.bar_index
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    pub fn signal_log(&self) -> &SignalLog {
        &self.log
    }

    pub fn trace(&self) -> &[BarSnapshot] {
        &self.trace
    }

    pub fn relation(&self) -> Relation {
        self.detector.relation()
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }
}
