//! Feature and label construction.
//!
//! From two aligned close-price series (target stock, factor fund) the
//! pipeline derives:
//! - lagged returns over 1, 3, 5 and 10 rows for both instruments
//! - a 30-row rolling correlation of their 1-day returns
//! - the target's fractional distance from its 20-row SMA
//!
//! and a binary label: 1 when the target closes higher `horizon` rows later.
//!
//! Rows with any missing feature (rolling warm-up at the head) or an unknown
//! label (forward window past the end at the tail) are dropped from X and y
//! together. Tail rows with complete features are returned separately as
//! `pending` so the most recent day can still be scored.
//!
//! No value at row t depends on prices after t except the label.

use super::align::{inner_join, CombinedFrame};
use super::table::{Dataset, FeatureTable, LabelColumn};
use crate::data::TickerManager;
use crate::domain::PriceSeries;
use crate::window::{pct_change, rolling_corr, rolling_mean, shift};
use thiserror::Error;

/// Return lags, in trading days.
pub const RETURN_LAGS: [usize; 4] = [1, 3, 5, 10];
/// Rolling correlation window, in trading days.
pub const CORRELATION_WINDOW: usize = 30;
/// Trend indicator moving-average window, in trading days.
pub const SMA_WINDOW: usize = 20;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("price data unavailable for {symbol}")]
    DataUnavailable { symbol: String },

    #[error("forecast horizon must be at least 1 trading day")]
    InvalidHorizon,
}

/// Column names for a target/factor pair, in table order.
pub fn feature_columns(target: &str, factor: &str) -> Vec<String> {
    let mut columns = Vec::with_capacity(RETURN_LAGS.len() * 2 + 2);
    for lag in RETURN_LAGS {
        columns.push(format!("{target}_return_{lag}d"));
        columns.push(format!("{factor}_return_{lag}d"));
    }
    columns.push(format!("Corr_{target}_{factor}_{CORRELATION_WINDOW}d"));
    columns.push(format!("{target}_vs_SMA{SMA_WINDOW}"));
    columns
}

/// Align two series and derive features and labels.
pub fn build_dataset(
    target: &PriceSeries,
    factor: &PriceSeries,
    horizon: usize,
) -> Result<Dataset, PipelineError> {
    if horizon == 0 {
        return Err(PipelineError::InvalidHorizon);
    }
    let frame = inner_join(target, factor);
    Ok(build_from_frame(&frame, horizon))
}

/// Derive features and labels from an already aligned frame. `horizon >= 1`.
pub fn build_from_frame(frame: &CombinedFrame, horizon: usize) -> Dataset {
    let columns = feature_columns(&frame.target_symbol, &frame.factor_symbol);
    let mut series: Vec<Vec<f64>> = Vec::with_capacity(columns.len());

    for lag in RETURN_LAGS {
        series.push(pct_change(&frame.target, lag));
        series.push(pct_change(&frame.factor, lag));
    }

    let target_ret = pct_change(&frame.target, 1);
    let factor_ret = pct_change(&frame.factor, 1);
    series.push(rolling_corr(&target_ret, &factor_ret, CORRELATION_WINDOW));

    let sma = rolling_mean(&frame.target, SMA_WINDOW);
    series.push(
        frame
            .target
            .iter()
            .zip(&sma)
            .map(|(&p, &m)| (p - m) / m)
            .collect(),
    );

    let future = shift(&frame.target, -(horizon as isize));

    let mut features = FeatureTable::empty(columns.clone());
    let mut labels = LabelColumn::empty();
    let mut pending = FeatureTable::empty(columns);
    let mut target_close = Vec::new();

    for (i, &date) in frame.dates.iter().enumerate() {
        let row: Vec<f64> = series.iter().map(|col| col[i]).collect();
        if row.iter().any(|v| !v.is_finite()) {
            continue;
        }
        let (now, later) = (frame.target[i], future[i]);
        if later.is_nan() {
            pending.push(date, row);
        } else {
            features.push(date, row);
            labels.push(date, u8::from(later > now));
            target_close.push(now);
        }
    }

    tracing::info!(
        horizon,
        rows = features.len(),
        pending = pending.len(),
        dropped = frame.len() - features.len() - pending.len(),
        "built features and labels"
    );

    Dataset {
        horizon,
        features,
        labels,
        pending,
        target_close,
    }
}

/// Pipeline bound to the target and factor ticker managers.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    target: TickerManager,
    factor: TickerManager,
}

impl FeaturePipeline {
    pub fn new(target: TickerManager, factor: TickerManager) -> Self {
        Self { target, factor }
    }

    pub fn target(&self) -> &TickerManager {
        &self.target
    }

    pub fn factor(&self) -> &TickerManager {
        &self.factor
    }

    /// Fetch both series fresh and build the dataset for `horizon` days ahead.
    ///
    /// An empty dataset (see `Dataset::is_empty`) means the history is too
    /// short for the rolling windows plus the horizon.
    pub fn build_features_and_label(&self, horizon: usize) -> Result<Dataset, PipelineError> {
        if horizon == 0 {
            return Err(PipelineError::InvalidHorizon);
        }
        tracing::info!(
            horizon,
            target = self.target.symbol(),
            factor = self.factor.symbol(),
            "building features"
        );

        let target = self
            .target
            .load_prices()
            .ok_or_else(|| PipelineError::DataUnavailable {
                symbol: self.target.symbol().to_string(),
            })?;
        let factor = self
            .factor
            .load_prices()
            .ok_or_else(|| PipelineError::DataUnavailable {
                symbol: self.factor.symbol().to_string(),
            })?;

        build_dataset(&target, &factor, horizon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn frame(target: Vec<f64>, factor: Vec<f64>) -> CombinedFrame {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        CombinedFrame {
            target_symbol: "AAPL".into(),
            factor_symbol: "SMH".into(),
            dates: (0..target.len())
                .map(|i| start + chrono::Duration::days(i as i64))
                .collect(),
            target,
            factor,
        }
    }

    fn wavy(n: usize, base: f64, phase: f64) -> Vec<f64> {
        (0..n)
            .map(|i| base + (i as f64 * 0.7 + phase).sin() * 3.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn column_layout() {
        let cols = feature_columns("AAPL", "SMH");
        assert_eq!(cols.len(), 10);
        assert_eq!(cols[0], "AAPL_return_1d");
        assert_eq!(cols[1], "SMH_return_1d");
        assert_eq!(cols[7], "SMH_return_10d");
        assert_eq!(cols[8], "Corr_AAPL_SMH_30d");
        assert_eq!(cols[9], "AAPL_vs_SMA20");
    }

    #[test]
    fn warm_up_and_tail_rows_are_dropped() {
        let f = frame(wavy(60, 100.0, 0.0), wavy(60, 200.0, 1.0));
        let ds = build_from_frame(&f, 5);
        // First complete row is index 30 (correlation needs 30 returns).
        assert_eq!(ds.features.dates[0], f.dates[30]);
        // Last labelled row is 5 rows before the end.
        assert_eq!(*ds.features.dates.last().unwrap(), f.dates[54]);
        assert_eq!(ds.len(), 25);
        assert_eq!(ds.pending.len(), 5);
        assert_eq!(ds.features.dates, ds.labels.dates);
    }

    #[test]
    fn label_compares_close_h_rows_ahead() {
        let mut target = wavy(40, 100.0, 0.0);
        target[35] = 100.0;
        target[36] = 101.0;
        target[38] = 99.0;
        let f = frame(target, wavy(40, 200.0, 2.0));
        let ds = build_from_frame(&f, 1);

        let at = |day: usize| ds.features.position(f.dates[day]).unwrap();
        assert_eq!(ds.labels.values[at(35)], 1);
        target_row_dropped(&ds, &f, 39);

        let f2 = frame(
            {
                let mut t = wavy(40, 100.0, 0.0);
                t[35] = 100.0;
                t[36] = 99.0;
                t
            },
            wavy(40, 200.0, 2.0),
        );
        let ds2 = build_from_frame(&f2, 1);
        let idx = ds2.features.position(f2.dates[35]).unwrap();
        assert_eq!(ds2.labels.values[idx], 0);
    }

    fn target_row_dropped(ds: &Dataset, f: &CombinedFrame, day: usize) {
        assert!(ds.features.position(f.dates[day]).is_none());
        assert!(!ds.labels.dates.contains(&f.dates[day]));
    }

    #[test]
    fn equal_future_price_is_not_a_rise() {
        let mut target = wavy(45, 100.0, 0.0);
        target[40] = 120.0;
        target[42] = 120.0;
        let f = frame(target, wavy(45, 200.0, 0.5));
        let ds = build_from_frame(&f, 2);
        let idx = ds.features.position(f.dates[40]).unwrap();
        assert_eq!(ds.labels.values[idx], 0);
    }

    #[test]
    fn sma_deviation_zero_when_close_equals_mean() {
        // Day 35 close chosen so the trailing 20-day mean equals it.
        let mut target = wavy(40, 100.0, 0.0);
        let others: f64 = target[16..35].iter().sum();
        target[35] = others / 19.0;
        let f = frame(target, wavy(40, 200.0, 1.5));
        let ds = build_from_frame(&f, 1);

        let sma_col = ds.features.column_index("AAPL_vs_SMA20").unwrap();
        let idx = ds.features.position(f.dates[35]).unwrap();
        assert!(ds.features.rows[idx][sma_col].abs() < 1e-12);
    }

    #[test]
    fn too_short_history_gives_empty_dataset() {
        let f = frame(wavy(35, 100.0, 0.0), wavy(35, 200.0, 1.0));
        let ds = build_from_frame(&f, 10);
        assert!(ds.is_empty());
        assert!(ds.labels.is_empty());
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let t = PriceSeries::new("AAPL", vec![]);
        let f = PriceSeries::new("SMH", vec![]);
        assert!(matches!(build_dataset(&t, &f, 0), Err(PipelineError::InvalidHorizon)));
    }

    #[test]
    fn target_close_tracks_labelled_rows() {
        let f = frame(wavy(50, 100.0, 0.0), wavy(50, 200.0, 1.0));
        let ds = build_from_frame(&f, 3);
        assert_eq!(ds.target_close.len(), ds.len());
        let first = f.dates.iter().position(|d| *d == ds.features.dates[0]).unwrap();
        assert_eq!(ds.target_close[0], f.target[first]);
    }
}
