//! Market data: providers, normalization, ticker managers.

pub mod csv_import;
pub mod manager;
pub mod memory;
pub mod normalize;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use csv_import::CsvProvider;
pub use manager::TickerManager;
pub use memory::MemoryProvider;
pub use provider::{DataError, DataProvider, Lookback};
pub use synthetic::{synthetic_pair, synthetic_series, SyntheticSpec};
pub use yahoo::YahooProvider;
