//! Multi-horizon prediction run.
//!
//! Trains one model per configured horizon, scores the most recent complete
//! feature row with each, and appends the verdicts to the prediction log.
//! A training failure on any horizon aborts the run before anything is
//! written; a log write failure does not.

use chrono::NaiveDate;
use pricecast_core::data::TickerManager;
use pricecast_core::features::{FeaturePipeline, PipelineError};
use pricecast_core::model::ModelError;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::AppConfig;
use crate::log::{HorizonPrediction, PredictionLog, PredictionRecord};
use crate::trainer::{train_model, TrainError};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("training the {horizon}-day model failed: {source}")]
    Train {
        horizon: usize,
        #[source]
        source: TrainError,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("no complete feature row to score")]
    NoFeatureRow,

    #[error("price data unavailable for {symbol}")]
    TargetUnavailable { symbol: String },

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

/// What happened to the log write.
#[derive(Debug, Clone, PartialEq)]
pub enum LogOutcome {
    Written(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PredictionReport {
    pub record: PredictionRecord,
    /// Date of the feature row that was scored.
    pub feature_date: NaiveDate,
    /// Hold-out accuracy per horizon, in run order.
    pub accuracies: Vec<(usize, f64)>,
    pub log_outcome: LogOutcome,
}

/// Run predictions dated today (local time).
pub fn run_predictions(
    pipeline: &FeaturePipeline,
    target: &TickerManager,
    config: &AppConfig,
) -> Result<PredictionReport, PredictError> {
    let today = chrono::Local::now().date_naive();
    run_predictions_on(pipeline, target, config, today)
}

/// Run predictions with an explicit prediction date.
pub fn run_predictions_on(
    pipeline: &FeaturePipeline,
    target: &TickerManager,
    config: &AppConfig,
    prediction_date: NaiveDate,
) -> Result<PredictionReport, PredictError> {
    let horizons = &config.prediction.horizons;
    tracing::info!(?horizons, "starting prediction run");

    let mut models = Vec::with_capacity(horizons.len());
    for &horizon in horizons {
        let model = train_model(pipeline, horizon, &config.model)
            .map_err(|source| PredictError::Train { horizon, source })?;
        models.push(model);
    }

    let latest = pipeline.build_features_and_label(1)?;
    let (feature_date, row) = latest.latest_row().ok_or(PredictError::NoFeatureRow)?;

    let mut verdicts = Vec::with_capacity(models.len());
    for model in &models {
        let p = model.classifier.predict(row)?;
        tracing::debug!(
            horizon = model.horizon,
            class = p.class,
            confidence = p.confidence,
            "scored latest row"
        );
        verdicts.push(HorizonPrediction {
            horizon: model.horizon,
            class: p.class,
            confidence: p.confidence,
        });
    }

    let series = target
        .load_prices()
        .ok_or_else(|| PredictError::TargetUnavailable {
            symbol: target.symbol().to_string(),
        })?;
    let (last_close_date, last_close_price) =
        series.last_close().ok_or_else(|| PredictError::TargetUnavailable {
            symbol: target.symbol().to_string(),
        })?;

    let record = PredictionRecord {
        prediction_date,
        last_close_date,
        last_close_price,
        horizons: verdicts,
    };

    let log = PredictionLog::new(&config.prediction.log_path);
    let log_outcome = match log.append(&record) {
        Ok(()) => LogOutcome::Written(log.path().to_path_buf()),
        Err(e) => {
            tracing::warn!(error = %e, "prediction log write failed");
            LogOutcome::Failed(e.to_string())
        }
    };

    Ok(PredictionReport {
        record,
        feature_date,
        accuracies: models.iter().map(|m| (m.horizon, m.report.accuracy)).collect(),
        log_outcome,
    })
}
