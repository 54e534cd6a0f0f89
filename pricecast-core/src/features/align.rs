//! Two-instrument date alignment.
//!
//! Policy: inner join. A date survives only when both instruments have a
//! usable price on it. Nothing is forward-filled or zero-filled; a padded row
//! would leak a fake zero return into every rolling window that covers it.

use crate::domain::PriceSeries;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Aligned close prices of the target and factor instruments.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedFrame {
    pub target_symbol: String,
    pub factor_symbol: String,
    pub dates: Vec<NaiveDate>,
    pub target: Vec<f64>,
    pub factor: Vec<f64>,
}

impl CombinedFrame {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Intersect both series on date, using each instrument's chosen price column.
///
/// Output dates follow the target's (increasing) order. Dates where either
/// chosen price is missing or non-finite are dropped as well.
pub fn inner_join(target: &PriceSeries, factor: &PriceSeries) -> CombinedFrame {
    let factor_prices: HashMap<NaiveDate, f64> = factor
        .dates()
        .into_iter()
        .zip(factor.prices())
        .collect();

    let mut frame = CombinedFrame {
        target_symbol: target.symbol.clone(),
        factor_symbol: factor.symbol.clone(),
        dates: Vec::with_capacity(target.len().min(factor.len())),
        target: Vec::new(),
        factor: Vec::new(),
    };

    for (date, t) in target.dates().into_iter().zip(target.prices()) {
        let Some(&f) = factor_prices.get(&date) else {
            continue;
        };
        if !t.is_finite() || !f.is_finite() {
            continue;
        }
        frame.dates.push(date);
        frame.target.push(t);
        frame.factor.push(f);
    }

    tracing::debug!(
        target_rows = target.len(),
        factor_rows = factor.len(),
        joined_rows = frame.len(),
        "aligned price series"
    );
    frame
}
