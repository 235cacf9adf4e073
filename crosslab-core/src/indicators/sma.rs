//! Simple Moving Average (SMA).
//!
//! Mean of the last `period` closes, kept in a fixed-capacity window.
//! Lookback: period - 1 (first defined value on the period-th update).

use std::collections::VecDeque;

use super::Indicator;
use crate::config::ConfigError;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
    window: VecDeque<f64>,
    current: Option<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, ConfigError> {
        if period == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(Self {
            period,
            name: format!("sma_{period}"),
            window: VecDeque::with_capacity(period),
            current: None,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn update(&mut self, close: f64) -> Option<f64> {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(close);

        // Sum the whole window each bar: the value is exactly its mean.
        self.current = if self.window.len() == self.period {
            let sum: f64 = self.window.iter().sum();
            Some(sum / self.period as f64)
        } else {
            None
        };
        self.current
    }

    fn value(&self) -> Option<f64> {
        self.current
    }
}
