//! Deterministic generated series for offline runs, demos and tests.
//!
//! Dates are consecutive weekdays. The random walk is seeded, so the same
//! `(bars, seed)` always yields the same series.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::provider::{check_range, DataError, DataProvider};
use crate::domain::{DataIntegrityError, PriceBar, PriceSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticKind {
    /// Constant close of 100.
    Flat,
    /// Close rising by 1 per bar from 100.
    Linear,
    /// Seeded multiplicative random walk from 100.
    RandomWalk,
}

impl std::str::FromStr for SyntheticKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "flat" => Ok(SyntheticKind::Flat),
            "linear" => Ok(SyntheticKind::Linear),
            "random_walk" | "random" => Ok(SyntheticKind::RandomWalk),
            other => Err(format!("unknown synthetic kind '{other}' (flat, linear, random_walk)")),
        }
    }
}

/// First date used when no start date is given.
pub fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// `n` consecutive weekdays starting at `start` (or the next weekday).
pub fn weekdays(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(n);
    let mut day = start;
    while dates.len() < n {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(day);
        }
        day += Duration::days(1);
    }
    dates
}

pub fn flat(symbol: &str, n: usize, close: f64) -> Result<PriceSeries, DataIntegrityError> {
    let bars = weekdays(default_start(), n)
        .into_iter()
        .map(|d| PriceBar::from_close(d, close))
        .collect();
    PriceSeries::new(symbol, bars)
}

pub fn linear(
    symbol: &str,
    n: usize,
    first: f64,
    step: f64,
) -> Result<PriceSeries, DataIntegrityError> {
    let bars = weekdays(default_start(), n)
        .into_iter()
        .enumerate()
        .map(|(i, d)| PriceBar::from_close(d, first + step * i as f64))
        .collect();
    PriceSeries::new(symbol, bars)
}

pub fn random_walk(symbol: &str, n: usize, seed: u64) -> Result<PriceSeries, DataIntegrityError> {
    generate(SyntheticKind::RandomWalk, symbol, default_start(), n, seed)
}

pub fn generate(
    kind: SyntheticKind,
    symbol: &str,
    start: NaiveDate,
    n: usize,
    seed: u64,
) -> Result<PriceSeries, DataIntegrityError> {
    let dates = weekdays(start, n);
    let bars = match kind {
        SyntheticKind::Flat => dates.into_iter().map(|d| PriceBar::from_close(d, 100.0)).collect(),
        SyntheticKind::Linear => dates
            .into_iter()
            .enumerate()
            .map(|(i, d)| PriceBar::from_close(d, 100.0 + i as f64))
            .collect(),
        SyntheticKind::RandomWalk => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut prev_close = 100.0_f64;
            dates
                .into_iter()
                .map(|date| {
                    let open = prev_close;
                    let close = (open * (1.0 + rng.gen_range(-0.02..0.02))).max(0.01);
                    let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
                    let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
                    let volume = rng.gen_range(100_000..1_000_000);
                    prev_close = close;
                    PriceBar::new(date, open, high, low, close, volume)
                })
                .collect()
        }
    };
    PriceSeries::new(symbol, bars)
}

/// Provider that generates `bars` weekdays from the requested start date and
/// keeps those before the requested end date.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    kind: SyntheticKind,
    bars: usize,
    seed: u64,
}

impl SyntheticProvider {
    pub fn new(kind: SyntheticKind, bars: usize, seed: u64) -> Self {
        Self { kind, bars, seed }
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        check_range(start, end)?;
        let series = generate(self.kind, symbol, start, self.bars, self.seed)?;
        Ok(series.slice_dates(start, end))
    }
}
