//! Model trainer: pipeline, chronological split, fit, evaluation.

use pricecast_core::features::{Dataset, FeaturePipeline, FeatureTable, PipelineError};
use pricecast_core::model::{
    chronological_split, ClassificationReport, GradientBoostedClassifier, ModelError,
};
use chrono::NaiveDate;
use thiserror::Error;

use crate::config::ModelConfig;

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("not enough history to train the {horizon}-day model ({rows} usable rows)")]
    InsufficientHistory { horizon: usize, rows: usize },

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

/// Held-out test rows with the model's verdict on each.
#[derive(Debug, Clone, PartialEq)]
pub struct Holdout {
    pub features: FeatureTable,
    pub actual: Vec<u8>,
    pub predicted: Vec<u8>,
    /// Posterior probability of a rise per row.
    pub probability_up: Vec<f64>,
    /// Target close on each test date, for charting.
    pub target_close: Vec<f64>,
}

impl Holdout {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.features.dates
    }

    pub fn len(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }
}

/// A fitted classifier for one horizon plus its out-of-sample evaluation.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub horizon: usize,
    pub classifier: GradientBoostedClassifier,
    pub report: ClassificationReport,
    pub holdout: Holdout,
    pub train_rows: usize,
}

/// Build features for `horizon`, then fit and evaluate.
pub fn train_model(
    pipeline: &FeaturePipeline,
    horizon: usize,
    config: &ModelConfig,
) -> Result<TrainedModel, TrainError> {
    tracing::info!(horizon, "training model");
    let dataset = pipeline.build_features_and_label(horizon)?;
    train_on_dataset(&dataset, config)
}

/// Split a prepared dataset chronologically, fit on the older part and
/// evaluate on the most recent part.
pub fn train_on_dataset(
    dataset: &Dataset,
    config: &ModelConfig,
) -> Result<TrainedModel, TrainError> {
    let horizon = dataset.horizon;
    let split = chronological_split(dataset.len(), config.test_percent);
    if dataset.is_empty() || split.train.is_empty() || split.test.is_empty() {
        return Err(TrainError::InsufficientHistory {
            horizon,
            rows: dataset.len(),
        });
    }

    let train_x = dataset.features.slice(split.train.clone());
    let train_y = dataset.labels.slice(split.train.clone());
    let test_x = dataset.features.slice(split.test.clone());
    let test_y = dataset.labels.slice(split.test.clone());

    tracing::debug!(
        horizon,
        train_rows = train_x.len(),
        test_rows = test_x.len(),
        train_positive_rate = train_y.positive_rate(),
        "chronological split"
    );

    let classifier =
        GradientBoostedClassifier::fit(config.boost_params(), &train_x, &train_y.values)?;
    let predictions = classifier.predict_table(&test_x)?;
    let predicted: Vec<u8> = predictions.iter().map(|p| p.class).collect();
    let report = ClassificationReport::from_labels(&test_y.values, &predicted);

    tracing::info!(
        horizon,
        accuracy = report.accuracy,
        test_rows = test_y.len(),
        "model evaluated"
    );

    Ok(TrainedModel {
        horizon,
        classifier,
        report,
        holdout: Holdout {
            features: test_x,
            actual: test_y.values,
            predicted,
            probability_up: predictions.iter().map(|p| p.probability_up).collect(),
            target_close: dataset.target_close[split.test].to_vec(),
        },
        train_rows: split.train.len(),
    })
}
