//! Prediction runner end to end on the in-memory provider.

use chrono::NaiveDate;
use pricecast_core::data::{synthetic_pair, Lookback, MemoryProvider, TickerManager};
use pricecast_core::features::FeaturePipeline;
use pricecast_runner::{
    run_predictions_on, AppConfig, LogOutcome, PredictError, TrainError,
};
use std::path::Path;
use std::sync::Arc;

fn managers(days: usize) -> (FeaturePipeline, TickerManager) {
    let (target, factor) = synthetic_pair("AAPL", "SMH", days);
    let provider = Arc::new(MemoryProvider::new().with_series(target).with_series(factor));
    let t = TickerManager::new("AAPL", Lookback::default(), provider.clone());
    let f = TickerManager::new("SMH", Lookback::default(), provider);
    (FeaturePipeline::new(t.clone(), f), t)
}

fn config(log_path: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.model.n_estimators = 8;
    config.model.max_depth = 3;
    config.prediction.log_path = log_path.to_path_buf();
    config
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
}

#[test]
fn logs_one_row_per_run_with_every_horizon() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("predictions").join("prediction_log.csv");
    let (pipeline, target) = managers(400);
    let config = config(&log_path);

    let report = run_predictions_on(&pipeline, &target, &config, today()).unwrap();
    let horizons: Vec<usize> = report.record.horizons.iter().map(|h| h.horizon).collect();
    assert_eq!(horizons, vec![1, 5, 21]);
    for h in &report.record.horizons {
        assert!(h.class <= 1);
        assert!((0.5..=1.0).contains(&h.confidence));
    }
    assert_eq!(report.log_outcome, LogOutcome::Written(log_path.clone()));

    let (series_date, series_price) = synthetic_pair("AAPL", "SMH", 400).0.last_close().unwrap();
    assert_eq!(report.record.last_close_date, series_date);
    assert_eq!(report.record.last_close_price, series_price);
    assert_eq!(report.feature_date, series_date);

    run_predictions_on(&pipeline, &target, &config, today()).unwrap();
    let content = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "prediction_date,last_close_date,last_close_price,pred_1d,conf_1d,pred_5d,conf_5d,pred_21d,conf_21d"
    );
    assert!(lines[1].starts_with("2026-01-05,"));
    assert!(lines[1].ends_with('%'));
}

#[test]
fn short_history_aborts_before_logging() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("prediction_log.csv");
    // 45 rows: 15 complete feature rows, none labelled 21 days ahead.
    let (pipeline, target) = managers(45);

    let err = run_predictions_on(&pipeline, &target, &config(&log_path), today()).unwrap_err();
    assert!(matches!(
        err,
        PredictError::Train {
            horizon: 21,
            source: TrainError::InsufficientHistory { .. }
        }
    ));
    assert!(!log_path.exists());
}

#[test]
fn log_failure_does_not_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened as a CSV file.
    let (pipeline, target) = managers(300);
    let report = run_predictions_on(&pipeline, &target, &config(dir.path()), today()).unwrap();
    assert!(matches!(report.log_outcome, LogOutcome::Failed(_)));
    assert_eq!(report.record.horizons.len(), 3);
}
