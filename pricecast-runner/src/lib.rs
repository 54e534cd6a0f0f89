//! Pricecast Runner: training, prediction runs, prediction log, configuration.
//!
//! This crate builds on `pricecast-core` to provide:
//! - TOML application configuration with defaults and validation
//! - Model trainer (chronological split, fit, evaluation report)
//! - Multi-horizon prediction runner and its append-only CSV log
//! - The evaluation session holding the model behind the charts

pub mod config;
pub mod log;
pub mod prediction;
pub mod session;
pub mod trainer;

pub use config::{
    AppConfig, ConfigError, DataConfig, ModelConfig, PlotConfig, PredictionConfig, TickerConfig,
    MAX_LOOKBACK_YEARS,
};
pub use log::{format_confidence, HorizonPrediction, LogError, PredictionLog, PredictionRecord};
pub use prediction::{
    run_predictions, run_predictions_on, LogOutcome, PredictError, PredictionReport,
};
pub use session::EvaluationSession;
pub use trainer::{train_model, train_on_dataset, Holdout, TrainError, TrainedModel};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_is_send_sync() {
        assert_send::<AppConfig>();
        assert_sync::<AppConfig>();
    }

    #[test]
    fn trained_model_is_send_sync() {
        assert_send::<TrainedModel>();
        assert_sync::<TrainedModel>();
    }

    #[test]
    fn prediction_report_is_send_sync() {
        assert_send::<PredictionReport>();
        assert_sync::<PredictionReport>();
    }
}
