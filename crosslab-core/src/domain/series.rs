//! PriceSeries — validated, date-ordered bars for one symbol.

use super::bar::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed or out-of-order input data. Raised once, at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataIntegrityError {
    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("duplicate date {date} at bar {index}")]
    DuplicateDate { index: usize, date: NaiveDate },

    #[error("bar {index} dated {date} is not after previous bar dated {previous}")]
    OutOfOrder {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("malformed bar {index} dated {date}: {reason}")]
    MalformedBar {
        index: usize,
        date: NaiveDate,
        reason: String,
    },
}

/// Immutable bar sequence for a single ticker, strictly increasing by date.
///
/// An empty series is valid and means "no data".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Validate and wrap `bars`. Fails on the first integrity violation.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, DataIntegrityError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(DataIntegrityError::EmptySymbol);
        }

        for (index, bar) in bars.iter().enumerate() {
            if let Some(reason) = bar.defect() {
                return Err(DataIntegrityError::MalformedBar {
                    index,
                    date: bar.date,
                    reason,
                });
            }
        }

        for (index, pair) in bars.windows(2).enumerate() {
            let (previous, current) = (pair[0].date, pair[1].date);
            if current == previous {
                return Err(DataIntegrityError::DuplicateDate {
                    index: index + 1,
                    date: current,
                });
            }
            if current < previous {
                return Err(DataIntegrityError::OutOfOrder {
                    index: index + 1,
                    previous,
                    date: current,
                });
            }
        }

        Ok(Self { symbol, bars })
    }

    /// An empty series for `symbol` ("no data" from the upstream provider).
    pub fn empty(symbol: impl Into<String>) -> Result<Self, DataIntegrityError> {
        Self::new(symbol, Vec::new())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }

    /// A new series holding the bars dated in `[start, end)`.
    pub fn slice_dates(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let bars = self
            .bars
            .iter()
            .filter(|b| b.date >= start && b.date < end)
            .copied()
            .collect();
        Self {
            symbol: self.symbol.clone(),
            bars,
        }
    }

    /// A new series holding the first `n` bars.
    pub fn truncated(&self, n: usize) -> Self {
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars[..n.min(self.bars.len())].to_vec(),
        }
    }
}

#[derive(Deserialize)]
struct RawSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawSeries::deserialize(deserializer)?;
        PriceSeries::new(raw.symbol, raw.bars).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn accepts_increasing_dates() {
        let bars = vec![PriceBar::from_close(day(2), 1.0), PriceBar::from_close(day(3), 2.0)];
        let series = PriceSeries::new("SPY", bars).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(day(2)));
        assert_eq!(series.last_date(), Some(day(3)));
    }

    #[test]
    fn accepts_empty() {
        let series = PriceSeries::empty("SPY").unwrap();
        assert!(series.is_empty());
        assert_eq!(series.first_date(), None);
    }

    #[test]
    fn rejects_duplicate_date() {
        let bars = vec![PriceBar::from_close(day(2), 1.0), PriceBar::from_close(day(2), 2.0)];
        let err = PriceSeries::new("SPY", bars).unwrap_err();
        assert_eq!(
            err,
            DataIntegrityError::DuplicateDate {
                index: 1,
                date: day(2)
            }
        );
    }

    #[test]
    fn rejects_out_of_order() {
        let bars = vec![
            PriceBar::from_close(day(2), 1.0),
            PriceBar::from_close(day(5), 2.0),
            PriceBar::from_close(day(4), 3.0),
        ];
        let err = PriceSeries::new("SPY", bars).unwrap_err();
        assert_eq!(
            err,
            DataIntegrityError::OutOfOrder {
                index: 2,
                previous: day(5),
                date: day(4)
            }
        );
    }

    #[test]
    fn rejects_malformed_bar() {
        let bars = vec![PriceBar::from_close(day(2), f64::NAN)];
        let err = PriceSeries::new("SPY", bars).unwrap_err();
        assert!(matches!(err, DataIntegrityError::MalformedBar { index: 0, .. }));
    }

    #[test]
    fn rejects_blank_symbol() {
        assert_eq!(PriceSeries::empty("  ").unwrap_err(), DataIntegrityError::EmptySymbol);
    }

    #[test]
    fn slice_dates_is_end_exclusive() {
        let bars = (2..=6).map(|d| PriceBar::from_close(day(d), d as f64)).collect();
        let series = PriceSeries::new("SPY", bars).unwrap();
        let sliced = series.slice_dates(day(3), day(5));
        let dates: Vec<_> = sliced.bars().iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![day(3), day(4)]);
    }

    #[test]
    fn deserialize_validates() {
        let json = r#"{"symbol":"SPY","bars":[
            {"date":"2024-01-03","open":1.0,"high":1.0,"low":1.0,"close":1.0,"volume":0},
            {"date":"2024-01-02","open":1.0,"high":1.0,"low":1.0,"close":1.0,"volume":0}
        ]}"#;
        assert!(serde_json::from_str::<PriceSeries>(json).is_err());
    }
}
