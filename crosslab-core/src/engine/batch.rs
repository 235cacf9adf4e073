//! Independent runs over many series.
//!
//! Each run builds its own `EngineState`; the engine and the series are only
//! borrowed immutably, so runs can execute on a rayon pool with no shared
//! mutable state.

use rayon::prelude::*;

use crate::domain::PriceSeries;
use crate::engine::error::BacktestError;
use crate::engine::loop_runner::BacktestEngine;
use crate::engine::result::BacktestResult;

/// Runs one engine configuration over a set of series.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    engine: BacktestEngine,
    parallel: bool,
}

impl BatchRunner {
    pub fn new(engine: BacktestEngine) -> Self {
        Self {
            engine,
            parallel: true,
        }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// One result per input series, in input order. A failing series does not
    /// affect the others.
    pub fn run(&self, series: &[PriceSeries]) -> Vec<Result<BacktestResult, BacktestError>> {
        if self.parallel {
            series.par_iter().map(|s| self.engine.run(s)).collect()
        } else {
            series.iter().map(|s| self.engine.run(s)).collect()
        }
    }
}

/// Parallel batch with default settings.
pub fn run_batch(
    engine: &BacktestEngine,
    series: &[PriceSeries],
) -> Vec<Result<BacktestResult, BacktestError>> {
    BatchRunner::new(*engine).run(series)
}
