//! CrossLab Core — dual moving-average crossover backtesting.
//!
//! This crate contains the whole simulation and its collaborators:
//! - Domain types (bars, validated price series, positions, signals, trades)
//! - Simple moving average with explicit warm-up
//! - Crossover detection with a sticky last-defined relation
//! - Bar-by-bar engine: single-unit long-only position, append-only signal log
//! - Data providers (Yahoo Finance, CSV, synthetic) and result export
//!
//! The engine never looks ahead: the decision for bar `t` depends only on
//! bars `0..=t`.

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod export;
pub mod indicators;
pub mod signals;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: results and configs can cross thread boundaries,
    /// which batch runs rely on.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::SignalEvent>();
        require_sync::<domain::SignalEvent>();
        require_send::<domain::Trade>();
        require_sync::<domain::Trade>();

        require_send::<indicators::Sma>();
        require_sync::<indicators::Sma>();
        require_send::<signals::CrossoverDetector>();
        require_sync::<signals::CrossoverDetector>();

        require_send::<engine::EngineConfig>();
        require_sync::<engine::EngineConfig>();
        require_send::<engine::BacktestEngine>();
        require_sync::<engine::BacktestEngine>();
        require_send::<engine::EngineState>();
        require_sync::<engine::EngineState>();
        require_send::<engine::BacktestResult>();
        require_sync::<engine::BacktestResult>();
        require_send::<engine::BacktestError>();
        require_sync::<engine::BacktestError>();

        require_send::<config::RunConfig>();
        require_sync::<config::RunConfig>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
    }

    /// Compile-time check: signals are market-only. The detector's input is
    /// two optional averages and nothing about the position.
    #[allow(dead_code)]
    fn detector_input_has_no_position(
        detector: &mut signals::CrossoverDetector,
        short: Option<f64>,
        long: Option<f64>,
    ) -> signals::Relation {
        detector.observe(short, long)
    }
}
