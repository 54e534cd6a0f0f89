//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV
//! import, in-memory fixtures) so ticker managers can be pointed at any of
//! them and tests never touch the network.

use crate::domain::{PriceSeries, TickerInfo};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
///
/// `NoData` is the "provider answered but had nothing" signal; every other
/// variant is a hard failure (transport, HTTP status, unparseable payload).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no data returned for {symbol}")]
    NoData { symbol: String },

    #[error("network unreachable: {0}")]
    Network(String),

    #[error("HTTP {status} for {symbol}")]
    Http { symbol: String, status: u16 },

    #[error("response format changed: {0}")]
    Parse(String),

    #[error("I/O error reading {path}: {reason}")]
    Io { path: String, reason: String },
}

impl DataError {
    /// True for the benign "nothing available" case.
    pub fn is_no_data(&self) -> bool {
        matches!(self, DataError::NoData { .. })
    }
}

/// Historical window ending today, expressed in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lookback {
    pub years: u32,
}

impl Lookback {
    pub const fn years(years: u32) -> Self {
        Self { years }
    }

    /// First date covered by the window when it ends on `end`. Windows
    /// reaching past the calendar start clamp to `NaiveDate::MIN`.
    pub fn start_from(&self, end: NaiveDate) -> NaiveDate {
        self.years
            .checked_mul(12)
            .and_then(|months| end.checked_sub_months(Months::new(months)))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self::years(10)
    }
}

/// Trait for market data providers.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for `symbol` covering `lookback` up to today.
    ///
    /// Returned series are normalized: daily dates, strictly increasing,
    /// no duplicates.
    fn fetch(&self, symbol: &str, lookback: Lookback) -> Result<PriceSeries, DataError>;

    /// Fetch descriptive information about `symbol`.
    fn info(&self, symbol: &str) -> Result<TickerInfo, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookback_subtracts_whole_years() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        assert_eq!(
            Lookback::years(10).start_from(end),
            NaiveDate::from_ymd_opt(2014, 6, 14).unwrap()
        );
    }

    #[test]
    fn lookback_clamps_leap_day() {
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            Lookback::years(1).start_from(end),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
    }

    #[test]
    fn huge_lookback_clamps_instead_of_overflowing() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        assert_eq!(Lookback::years(400_000_000).start_from(end), NaiveDate::MIN);
        assert_eq!(Lookback::years(u32::MAX).start_from(end), NaiveDate::MIN);
    }

    #[test]
    fn no_data_is_distinct_from_failures() {
        assert!(DataError::NoData { symbol: "X".into() }.is_no_data());
        assert!(!DataError::Network("down".into()).is_no_data());
    }
}
