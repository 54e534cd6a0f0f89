//! Domain types: bars, price series, ticker metadata.

pub mod bar;
pub mod info;
pub mod series;

pub use bar::Bar;
pub use info::TickerInfo;
pub use series::{PriceColumn, PriceSeries};
