//! BacktestResult — the one value handed to the reporting side.

use serde::{Deserialize, Serialize};

use crate::domain::{Position, SignalAction, Trade};
use crate::engine::config::EngineConfig;
use crate::engine::signal_log::SignalLog;
use crate::engine::state::{BarSnapshot, EngineState};

/// Bumped whenever the serialized result layout changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Headline numbers for a finished run (single unit, no costs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub bars: usize,
    pub signals: usize,
    pub buys: usize,
    pub sells: usize,
    pub closed_trades: usize,
    pub winners: usize,
    /// Fraction of closed trades with positive P&L; 0 when none closed.
    pub win_rate: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub final_close: Option<f64>,
}

impl Summary {
    fn from_parts(log: &SignalLog, trades: &[Trade], trace: &[BarSnapshot], position: Position) -> Self {
        let winners = trades.iter().filter(|t| t.is_winner()).count();
        let final_close = trace.last().map(|s| s.bar.close);
        Self {
            bars: trace.len(),
            signals: log.len(),
            buys: log.count(SignalAction::Buy),
            sells: log.count(SignalAction::Sell),
            closed_trades: trades.len(),
            winners,
            win_rate: if trades.is_empty() {
                0.0
            } else {
                winners as f64 / trades.len() as f64
            },
            realized_pnl: trades.iter().map(Trade::pnl).sum(),
            unrealized_pnl: final_close.map_or(0.0, |c| position.unrealized_pnl(c)),
            final_close,
        }
    }

    pub fn total_pnl(&self) -> f64 {
        self.realized_pnl + self.unrealized_pnl
    }
}

/// Result of a complete backtest run. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub schema_version: u32,
    pub symbol: String,
    pub config: EngineConfig,
    pub signal_log: SignalLog,
    pub final_position: Position,
    /// One snapshot per bar, in date order.
    pub trace: Vec<BarSnapshot>,
    /// Closed round trips, in exit order.
    pub trades: Vec<Trade>,
    pub summary: Summary,
}

impl BacktestResult {
    pub(crate) fn from_state(symbol: &str, config: EngineConfig, state: EngineState) -> Self {
        let final_position = state.tracker.position();
        let summary = Summary::from_parts(&state.log, &state.trades, &state.trace, final_position);
        Self {
            schema_version: SCHEMA_VERSION,
            symbol: symbol.to_string(),
            config,
            signal_log: state.log,
            final_position,
            trace: state.trace,
            trades: state.trades,
            summary,
        }
    }

    /// Short average per bar, `None` during warm-up.
    pub fn short_ma(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.trace.iter().map(|s| s.short_ma)
    }

    /// Long average per bar, `None` during warm-up.
    pub fn long_ma(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.trace.iter().map(|s| s.long_ma)
    }

    pub fn equity_curve(&self) -> impl Iterator<Item = f64> + '_ {
        self.trace.iter().map(|s| s.equity)
    }
}
