//! Backtesting engine — bar-by-bar replay of a single price series.
//!
//! The engine is configuration only. All mutable run state lives in an
//! `EngineState` created per run, driven one bar at a time by
//! `BacktestEngine::step`, and consumed into a `BacktestResult`.

pub mod batch;
pub mod config;
pub mod decision;
pub mod error;
pub mod loop_runner;
pub mod result;
pub mod signal_log;
pub mod state;
pub mod tracker;

pub use batch::{run_batch, BatchRunner};
pub use config::EngineConfig;
pub use decision::{decide, Decision};
pub use error::BacktestError;
pub use loop_runner::{run_backtest, BacktestEngine};
pub use result::{BacktestResult, Summary, SCHEMA_VERSION};
pub use signal_log::SignalLog;
pub use state::{BarSnapshot, EngineState};
pub use tracker::{InvalidTransition, PositionTracker};
