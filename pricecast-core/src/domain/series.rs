//! Price series for a single ticker.

use super::bar::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which price column feeds the feature pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceColumn {
    /// Split/dividend adjusted close.
    AdjClose,
    /// Raw close, used when the instrument has no adjusted data.
    Close,
}

/// Date-indexed daily bars for one ticker.
///
/// Bars are expected in strictly increasing date order with no duplicates;
/// `data::normalize` establishes that for every provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// True when the provider published an adjusted close column for this series.
    pub fn has_adj_close(&self) -> bool {
        self.bars.iter().any(|b| b.adj_close.is_some())
    }

    /// Adjusted close if the series carries it, plain close otherwise.
    pub fn price_column(&self) -> PriceColumn {
        if self.has_adj_close() {
            PriceColumn::AdjClose
        } else {
            PriceColumn::Close
        }
    }

    /// Values of the chosen price column. Missing adjusted values become NaN.
    pub fn prices(&self) -> Vec<f64> {
        let column = self.price_column();
        self.bars.iter().map(|b| price_of(b, column)).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Date and chosen-column price of the most recent bar.
    pub fn last_close(&self) -> Option<(NaiveDate, f64)> {
        let column = self.price_column();
        self.bars.last().map(|b| (b.date, price_of(b, column)))
    }

    /// Bars dated within `days` calendar days of the last bar (inclusive).
    pub fn recent(&self, days: i64) -> &[Bar] {
        let Some(last) = self.bars.last() else {
            return &self.bars;
        };
        let cutoff = last.date - chrono::Duration::days(days);
        let start = self.bars.partition_point(|b| b.date <= cutoff);
        &self.bars[start..]
    }
}

fn price_of(bar: &Bar, column: PriceColumn) -> f64 {
    match column {
        PriceColumn::AdjClose => bar.adj_close.unwrap_or(f64::NAN),
        PriceColumn::Close => bar.close,
    }
}
