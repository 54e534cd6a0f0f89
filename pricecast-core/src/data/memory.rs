//! In-memory provider backed by fixed series.

use super::provider::{DataError, DataProvider, Lookback};
use crate::domain::{PriceSeries, TickerInfo};
use std::collections::HashMap;

/// Serves pre-built series and info by symbol. Lookback is ignored: the
/// stored series is returned whole.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    series: HashMap<String, PriceSeries>,
    info: HashMap<String, TickerInfo>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.series.insert(series.symbol.clone(), series);
        self
    }

    pub fn with_info(mut self, info: TickerInfo) -> Self {
        self.info.insert(info.symbol.clone(), info);
        self
    }
}

impl DataProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, symbol: &str, _lookback: Lookback) -> Result<PriceSeries, DataError> {
        match self.series.get(symbol) {
            Some(series) if !series.is_empty() => Ok(series.clone()),
            _ => Err(DataError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }

    fn info(&self, symbol: &str) -> Result<TickerInfo, DataError> {
        self.info.get(symbol).cloned().ok_or_else(|| DataError::NoData {
            symbol: symbol.to_string(),
        })
    }
}
