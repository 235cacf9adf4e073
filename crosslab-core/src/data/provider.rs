//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV
//! files, synthetic series) so the engine can be driven and tested without a
//! network.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{DataIntegrityError, PriceSeries};

/// Fetch failures. Never to be confused with "no data", which is an empty
/// series.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("invalid date range: start {start} must be before end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),

    #[error("data error: {0}")]
    Other(String),
}

impl From<csv::Error> for DataError {
    fn from(e: csv::Error) -> Self {
        DataError::Csv(e.to_string())
    }
}

/// Source of daily bars for one symbol.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars dated in `[start, end)`.
    ///
    /// Returns an empty series when the provider has no bars in the window.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<PriceSeries, DataError>;
}

pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), DataError> {
    if start >= end {
        return Err(DataError::InvalidRange { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_must_be_increasing() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(check_range(a, b).is_ok());
        assert!(matches!(check_range(b, a), Err(DataError::InvalidRange { .. })));
        assert!(check_range(a, a).is_err());
    }

    #[test]
    fn integrity_errors_convert() {
        let err: DataError = DataIntegrityError::EmptySymbol.into();
        assert!(matches!(err, DataError::Integrity(DataIntegrityError::EmptySymbol)));
    }
}
