//! Gradient-boosted tree classifier for the binary "price up" label.
//!
//! Boosting minimises log loss with second-order (Newton) steps: each round
//! grows a `RegressionTree` on `grad = p - y` and `hess = p(1 - p)` of the
//! current margin and adds its shrunken leaf weights to the margin. Training
//! starts from margin 0 (p = 0.5). No randomness anywhere: the same rows and
//! labels always give the same model.

use super::tree::{RegressionTree, TreeParams};
use crate::features::FeatureTable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("{rows} feature rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("expected {expected} features per row, got {got}")]
    FeatureCount { expected: usize, got: usize },

    #[error("non-finite feature value at row {row}, column {column}")]
    NonFinite { row: usize, column: usize },

    #[error("label must be 0 or 1, got {0}")]
    InvalidLabel(u8),

    #[error("invalid boosting parameters: {0}")]
    InvalidParams(String),
}

/// Boosting hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostParams {
    /// Number of boosting rounds (trees).
    pub n_estimators: usize,
    /// Maximum depth of each tree.
    pub max_depth: usize,
    /// Shrinkage per round.
    pub learning_rate: f64,
    /// L2 penalty on leaf weights.
    pub lambda: f64,
    /// Minimum hessian sum in a child.
    pub min_child_weight: f64,
    /// Minimum loss reduction to split.
    pub gamma: f64,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 5,
            learning_rate: 0.1,
            lambda: 1.0,
            min_child_weight: 1.0,
            gamma: 0.0,
        }
    }
}

impl BoostParams {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParams("n_estimators must be >= 1".into()));
        }
        if self.max_depth == 0 {
            return Err(ModelError::InvalidParams("max_depth must be >= 1".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ModelError::InvalidParams(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.lambda < 0.0 || self.min_child_weight < 0.0 || self.gamma < 0.0 {
            return Err(ModelError::InvalidParams(
                "lambda, min_child_weight and gamma must be non-negative".into(),
            ));
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            lambda: self.lambda,
            min_child_weight: self.min_child_weight,
            gamma: self.gamma,
            learning_rate: self.learning_rate,
        }
    }
}

/// Class decision for one feature row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// 1 = price expected higher at the horizon.
    pub class: u8,
    /// Posterior probability of class 1.
    pub probability_up: f64,
    /// Posterior probability of the predicted class.
    pub confidence: f64,
}

impl Prediction {
    fn from_probability(p: f64) -> Self {
        let class = u8::from(p > 0.5);
        let confidence = if class == 1 { p } else { 1.0 - p };
        Self {
            class,
            probability_up: p,
            confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
struct GainTally {
    total: f64,
    splits: usize,
}

/// Fitted boosted-tree classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedClassifier {
    params: BoostParams,
    feature_names: Vec<String>,
    trees: Vec<RegressionTree>,
    gains: Vec<GainTally>,
}

impl GradientBoostedClassifier {
    /// Fit on a feature table and its 0/1 labels.
    pub fn fit(
        params: BoostParams,
        features: &FeatureTable,
        labels: &[u8],
    ) -> Result<Self, ModelError> {
        params.validate()?;
        if features.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if features.len() != labels.len() {
            return Err(ModelError::LengthMismatch {
                rows: features.len(),
                labels: labels.len(),
            });
        }
        if let Some(&bad) = labels.iter().find(|&&y| y > 1) {
            return Err(ModelError::InvalidLabel(bad));
        }
        let width = features.num_features();
        for (r, row) in features.rows.iter().enumerate() {
            if row.len() != width {
                return Err(ModelError::FeatureCount {
                    expected: width,
                    got: row.len(),
                });
            }
            if let Some(c) = row.iter().position(|v| !v.is_finite()) {
                return Err(ModelError::NonFinite { row: r, column: c });
            }
        }

        let tree_params = params.tree_params();
        let n = labels.len();
        let targets: Vec<f64> = labels.iter().map(|&y| f64::from(y)).collect();
        let mut margin = vec![0.0; n];
        let mut grad = vec![0.0; n];
        let mut hess = vec![0.0; n];
        let mut trees = Vec::with_capacity(params.n_estimators);
        let mut gains = vec![GainTally::default(); width];

        for round in 0..params.n_estimators {
            for i in 0..n {
                let p = sigmoid(margin[i]);
                grad[i] = p - targets[i];
                hess[i] = p * (1.0 - p);
            }

            let (tree, splits) = RegressionTree::grow(&features.rows, &grad, &hess, &tree_params);
            for s in &splits {
                gains[s.feature].total += s.gain;
                gains[s.feature].splits += 1;
            }
            for (m, row) in margin.iter_mut().zip(&features.rows) {
                *m += tree.predict(row);
            }
            trees.push(tree);

            if (round + 1) % 25 == 0 {
                tracing::debug!(
                    round = round + 1,
                    log_loss = log_loss(&margin, &targets),
                    "boosting progress"
                );
            }
        }

        tracing::info!(
            trees = trees.len(),
            rows = n,
            features = width,
            "fitted gradient-boosted classifier"
        );

        Ok(Self {
            params,
            feature_names: features.columns.clone(),
            trees,
            gains,
        })
    }

    pub fn params(&self) -> &BoostParams {
        &self.params
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    fn check_width(&self, row: &[f64]) -> Result<(), ModelError> {
        if row.len() != self.feature_names.len() {
            return Err(ModelError::FeatureCount {
                expected: self.feature_names.len(),
                got: row.len(),
            });
        }
        Ok(())
    }

    /// Posterior probability that the label is 1.
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64, ModelError> {
        self.check_width(row)?;
        let margin: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        Ok(sigmoid(margin))
    }

    pub fn predict(&self, row: &[f64]) -> Result<Prediction, ModelError> {
        self.predict_proba(row).map(Prediction::from_probability)
    }

    /// Predictions for every row of a table, in row order.
    pub fn predict_table(&self, table: &FeatureTable) -> Result<Vec<Prediction>, ModelError> {
        table.rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Average split gain per feature, in column order. Features never used
    /// for a split score 0.
    pub fn feature_importance(&self) -> Vec<(String, f64)> {
        self.feature_names
            .iter()
            .zip(&self.gains)
            .map(|(name, tally)| {
                let avg = if tally.splits == 0 {
                    0.0
                } else {
                    tally.total / tally.splits as f64
                };
                (name.clone(), avg)
            })
            .collect()
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn log_loss(margin: &[f64], targets: &[f64]) -> f64 {
    const EPS: f64 = 1e-15;
    let total: f64 = margin
        .iter()
        .zip(targets)
        .map(|(&m, &y)| {
            let p = sigmoid(m).clamp(EPS, 1.0 - EPS);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    total / margin.len().max(1) as f64
}
