//! Streaming indicators.
//!
//! Indicators are fed one close per bar and never see later bars, so a value
//! at bar t depends only on bars 0..=t.

pub mod sma;

pub use sma::Sma;

/// A single-series indicator updated once per bar.
pub trait Indicator: Send + Sync {
    /// Name for logging and export columns (e.g. `sma_15`).
    fn name(&self) -> &str;

    /// Number of bars before the first defined value (period - 1 for an SMA).
    fn lookback(&self) -> usize;

    /// Feed the next close. Returns the current value, `None` while warming up.
    fn update(&mut self, close: f64) -> Option<f64>;

    /// Value after the most recent update.
    fn value(&self) -> Option<f64>;

    fn is_warm(&self) -> bool {
        self.value().is_some()
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
