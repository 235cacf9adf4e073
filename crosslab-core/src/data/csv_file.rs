//! CSV import/export of daily bars.
//!
//! Reads the layout the dashboard exported from Yahoo downloads:
//! `Date,Open,High,Low,Close,Volume` (extra columns such as `Adj Close` are
//! ignored, header matching is case-insensitive). If no `Date` column exists
//! the first column is taken as the date. Rows before the first bar whose date
//! does not parse and whose close is not a number are the extra ticker/header
//! rows newer exports contain, and are skipped. Any other unparseable date is
//! an error.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, warn};

use super::provider::{check_range, DataError, DataProvider};
use crate::domain::{PriceBar, PriceSeries};

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DataError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| DataError::Csv(format!("missing column '{name}'")))
        };
        Ok(Self {
            date: find("date").or_else(|| find("datetime")).unwrap_or(0),
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find("volume"),
        })
    }
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    // Accept "2024-01-02" and timestamped forms like "2024-01-02 00:00:00+01:00".
    let head = cell.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn parse_price(cell: &str, column: &str, line: u64) -> Result<f64, DataError> {
    cell.trim()
        .parse::<f64>()
        .map_err(|_| DataError::Csv(format!("line {line}: bad {column} value '{cell}'")))
}

fn parse_volume(cell: &str, line: u64) -> Result<u64, DataError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(0);
    }
    let value = cell
        .parse::<f64>()
        .map_err(|_| DataError::Csv(format!("line {line}: bad volume value '{cell}'")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(DataError::Csv(format!("line {line}: negative volume '{cell}'")));
    }
    Ok(value.round() as u64)
}

/// Parse bars from any reader. The resulting series is validated.
pub fn read_csv_from_reader<R: Read>(reader: R, symbol: &str) -> Result<PriceSeries, DataError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let cols = Columns::from_headers(rdr.headers()?)?;

    let mut bars = Vec::new();
    let mut header_rows = 0usize;
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let cell = |i: usize| record.get(i).unwrap_or("");

        let Some(date) = parse_date(cell(cols.date)) else {
            // Extra header rows carry no numeric close and only precede the data.
            let numeric_close = cell(cols.close).trim().parse::<f64>().is_ok();
            if bars.is_empty() && !numeric_close {
                header_rows += 1;
                continue;
            }
            return Err(DataError::Csv(format!(
                "line {line}: bad date '{}' (expected YYYY-MM-DD)",
                cell(cols.date)
            )));
        };
        if cell(cols.close).trim().is_empty() {
            skipped += 1;
            continue;
        }
        let close = parse_price(cell(cols.close), "close", line)?;
        let or_close = |i: usize, name: &str| -> Result<f64, DataError> {
            if cell(i).trim().is_empty() {
                Ok(close)
            } else {
                parse_price(cell(i), name, line)
            }
        };
        bars.push(PriceBar {
            date,
            open: or_close(cols.open, "open")?,
            high: or_close(cols.high, "high")?,
            low: or_close(cols.low, "low")?,
            close,
            volume: match cols.volume {
                Some(i) => parse_volume(cell(i), line)?,
                None => 0,
            },
        });
    }

    if header_rows > 0 {
        debug!("{symbol}: skipped {header_rows} extra CSV header rows");
    }
    if skipped > 0 {
        warn!("{symbol}: skipped {skipped} CSV rows without a close");
    }
    Ok(PriceSeries::new(symbol, bars)?)
}

pub fn read_csv(path: &Path, symbol: &str) -> Result<PriceSeries, DataError> {
    let file = File::open(path)?;
    read_csv_from_reader(file, symbol)
}

/// Write `series` as `Date,Open,High,Low,Close,Volume`.
pub fn write_csv<W: Write>(series: &PriceSeries, writer: W) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Date", "Open", "High", "Low", "Close", "Volume"])?;
    for bar in series.bars() {
        wtr.write_record([
            bar.date.to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Provider backed by a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        check_range(start, end)?;
        Ok(read_csv(&self.path, symbol)?.slice_dates(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataIntegrityError;

    const SAMPLE: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-02,10.0,11.0,9.5,10.5,10.4,1000
2024-01-03,10.5,12.0,10.0,11.5,11.4,1500.0
2024-01-04,11.5,11.8,11.0,11.2,11.1,
";

    #[test]
    fn reads_standard_layout() {
        let series = read_csv_from_reader(SAMPLE.as_bytes(), "BBVA.MC").unwrap();
        assert_eq!(series.symbol(), "BBVA.MC");
        assert_eq!(series.len(), 3);
        let bar = series.bars()[1];
        assert_eq!(bar.date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(bar.close, 11.5);
        assert_eq!(bar.volume, 1500);
        assert_eq!(series.bars()[2].volume, 0);
    }

    #[test]
    fn skips_multi_header_rows() {
        let text = "\
Price,Close,High,Low,Open,Volume
Ticker,SAN.MC,SAN.MC,SAN.MC,SAN.MC,SAN.MC
Date,,,,,
2024-01-02 00:00:00+01:00,4.1,4.2,4.0,4.05,200
2024-01-03 00:00:00+01:00,4.2,4.3,4.1,4.1,300
";
        let series = read_csv_from_reader(text.as_bytes(), "SAN.MC").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0].close, 4.1);
        assert_eq!(series.bars()[0].open, 4.05);
    }

    #[test]
    fn foreign_date_format_is_an_error() {
        let text = "\
Date,Open,High,Low,Close,Volume
01/02/2024,1,1,1,1,0
01/03/2024,2,2,2,2,0
";
        let err = read_csv_from_reader(text.as_bytes(), "X").unwrap_err();
        match err {
            DataError::Csv(msg) => assert!(msg.contains("bad date '01/02/2024'"), "{msg}"),
            other => panic!("expected CSV error, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_after_first_bar_is_an_error() {
        let text = "\
Date,Open,High,Low,Close,Volume
2024-01-02,1,1,1,1,0
2024-1-3,2,2,2,2,0
2024-01-04,3,3,3,3,0
";
        let err = read_csv_from_reader(text.as_bytes(), "X").unwrap_err();
        match err {
            DataError::Csv(msg) => assert!(msg.starts_with("line 3: bad date '2024-1-3'"), "{msg}"),
            other => panic!("expected CSV error, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_an_error() {
        let text = "Date,Open,High,Low\n2024-01-02,1,1,1\n";
        assert!(matches!(
            read_csv_from_reader(text.as_bytes(), "X"),
            Err(DataError::Csv(_))
        ));
    }

    #[test]
    fn bad_number_is_an_error() {
        let text = "Date,Open,High,Low,Close,Volume\n2024-01-02,1,1,1,abc,1\n";
        assert!(matches!(
            read_csv_from_reader(text.as_bytes(), "X"),
            Err(DataError::Csv(_))
        ));
    }

    #[test]
    fn duplicate_dates_fail_integrity() {
        let text = "\
Date,Open,High,Low,Close,Volume
2024-01-02,1,1,1,1,1
2024-01-02,2,2,2,2,1
";
        assert!(matches!(
            read_csv_from_reader(text.as_bytes(), "X"),
            Err(DataError::Integrity(DataIntegrityError::DuplicateDate { .. }))
        ));
    }

    #[test]
    fn write_then_read() {
        let series = read_csv_from_reader(SAMPLE.as_bytes(), "BBVA.MC").unwrap();
        let mut buf = Vec::new();
        write_csv(&series, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Date,Open,High,Low,Close,Volume\n2024-01-02,10,11,9.5,10.5,1000"));
        let back = read_csv_from_reader(text.as_bytes(), "BBVA.MC").unwrap();
        assert_eq!(back, series);
    }
}
