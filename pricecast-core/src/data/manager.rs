//! Ticker managers, one per instrument.
//!
//! A manager binds a provider to a fixed symbol and lookback. It is the point
//! where provider failures stop being errors: transport and parse problems are
//! logged and become "data unavailable" (`None`) for the caller to report.

use super::provider::{DataProvider, Lookback};
use crate::domain::{PriceSeries, TickerInfo};
use std::sync::Arc;

#[derive(Clone)]
pub struct TickerManager {
    symbol: String,
    lookback: Lookback,
    provider: Arc<dyn DataProvider>,
}

impl TickerManager {
    pub fn new(
        symbol: impl Into<String>,
        lookback: Lookback,
        provider: Arc<dyn DataProvider>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            lookback,
            provider,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn lookback(&self) -> Lookback {
        self.lookback
    }

    /// Fetch the full price history. Fresh on every call.
    pub fn load_prices(&self) -> Option<PriceSeries> {
        tracing::info!(
            symbol = %self.symbol,
            provider = self.provider.name(),
            "loading price history"
        );
        match self.provider.fetch(&self.symbol, self.lookback) {
            Ok(series) if series.is_empty() => {
                tracing::warn!(symbol = %self.symbol, "provider returned an empty series");
                None
            }
            Ok(series) => {
                tracing::debug!(symbol = %self.symbol, bars = series.len(), "price history loaded");
                Some(series)
            }
            Err(e) if e.is_no_data() => {
                tracing::warn!(symbol = %self.symbol, "{e}");
                None
            }
            Err(e) => {
                tracing::warn!(symbol = %self.symbol, error = %e, "price fetch failed");
                None
            }
        }
    }

    /// Fetch descriptive info for the inspector view.
    pub fn load_info(&self) -> Option<TickerInfo> {
        match self.provider.info(&self.symbol) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(symbol = %self.symbol, error = %e, "info fetch failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for TickerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickerManager")
            .field("symbol", &self.symbol)
            .field("lookback", &self.lookback)
            .field("provider", &self.provider.name())
            .finish()
    }
}
