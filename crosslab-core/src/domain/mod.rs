//! Domain types for CrossLab

pub mod bar;
pub mod position;
pub mod series;
pub mod signal;
pub mod trade;

pub use bar::PriceBar;
pub use position::{Position, PositionStatus};
pub use series::{DataIntegrityError, PriceSeries};
pub use signal::{SignalAction, SignalEvent};
pub use trade::Trade;
