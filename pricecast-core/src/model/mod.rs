//! Classifier, chronological split and evaluation metrics.

pub mod gbm;
pub mod metrics;
pub mod split;
pub mod tree;

pub use gbm::{BoostParams, GradientBoostedClassifier, ModelError, Prediction};
pub use metrics::{ClassMetrics, ClassificationReport, ConfusionMatrix, CLASS_NAMES};
pub use split::{chronological_split, SplitIndex};
