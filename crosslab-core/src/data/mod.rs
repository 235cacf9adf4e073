//! Upstream data collaborators: providers that turn a symbol and a date
//! window into a validated `PriceSeries`.
//!
//! Every provider treats `start` as inclusive and `end` as exclusive. An empty
//! series means "no data"; fetch failures are `DataError`s.

pub mod csv_file;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use csv_file::{read_csv, read_csv_from_reader, write_csv, CsvProvider};
pub use provider::{check_range, DataError, DataProvider};
pub use synthetic::{SyntheticKind, SyntheticProvider};
pub use yahoo::YahooProvider;

/// Default tickers offered by the CLI (Madrid and ASX listings).
pub const WATCHLIST: &[&str] = &[
    "BBVA.MC", "SAN.MC", "ANE.MC", "MEL.MC", "REP.MC", "OFX.AX", "XC02.AX", "PEN.AX", "RBTZ.AX",
    "WMI.AX", "WAR.AX", "AGL.AX", "NUF.AX", "WWI.AX", "PPT.AX", "FLC.AX", "CSL.AX", "CRYP.AX",
    "PE1.AX", "PCX.AX", "MQAE.AX", "CSC.AX", "RIO.AX",
];
