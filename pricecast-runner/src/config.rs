//! Application configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock setup: AAPL against SMH, ten years of history, horizons 1/5/21.

use pricecast_core::data::Lookback;
use pricecast_core::model::BoostParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound on `data.lookback_years`.
pub const MAX_LOOKBACK_YEARS: u32 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("parse config TOML: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub tickers: TickerConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
    pub prediction: PredictionConfig,
    pub plots: PlotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Stock whose direction is predicted.
    pub target: String,
    /// Related fund used as an explanatory factor.
    pub factor: String,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            target: "AAPL".into(),
            factor: "SMH".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub lookback_years: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { lookback_years: 10 }
    }
}

impl DataConfig {
    pub fn lookback(&self) -> Lookback {
        Lookback::years(self.lookback_years)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub learning_rate: f64,
    /// Share of the most recent rows held out for evaluation, in percent.
    pub test_percent: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let boost = BoostParams::default();
        Self {
            n_estimators: boost.n_estimators,
            max_depth: boost.max_depth,
            learning_rate: boost.learning_rate,
            test_percent: 20,
        }
    }
}

impl ModelConfig {
    pub fn boost_params(&self) -> BoostParams {
        BoostParams {
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            learning_rate: self.learning_rate,
            ..BoostParams::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Horizons (trading days) scored on every prediction run, in log order.
    pub horizons: Vec<usize>,
    /// Horizon of the model trained for the evaluation charts.
    pub evaluation_horizon: usize,
    pub log_path: PathBuf,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            horizons: vec![1, 5, 21],
            evaluation_horizon: 5,
            log_path: PathBuf::from("predictions/prediction_log.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub output_dir: PathBuf,
    /// Calendar days shown on candlestick charts.
    pub candle_days: i64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plots"),
            candle_days: 180,
        }
    }
}

impl AppConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let (target, factor) = (self.tickers.target.trim(), self.tickers.factor.trim());
        if target.is_empty() || factor.is_empty() {
            return invalid("tickers.target and tickers.factor must be set".into());
        }
        if target.eq_ignore_ascii_case(factor) {
            return invalid(format!("target and factor are both {target}"));
        }
        if !(1..=MAX_LOOKBACK_YEARS).contains(&self.data.lookback_years) {
            return invalid(format!(
                "data.lookback_years must be in 1..={MAX_LOOKBACK_YEARS}, got {}",
                self.data.lookback_years
            ));
        }
        if self.model.n_estimators == 0 {
            return invalid("model.n_estimators must be >= 1".into());
        }
        if self.model.max_depth == 0 {
            return invalid("model.max_depth must be >= 1".into());
        }
        if !(self.model.learning_rate > 0.0 && self.model.learning_rate.is_finite()) {
            return invalid(format!(
                "model.learning_rate must be positive, got {}",
                self.model.learning_rate
            ));
        }
        if !(1..=99).contains(&self.model.test_percent) {
            return invalid(format!(
                "model.test_percent must be in 1..=99, got {}",
                self.model.test_percent
            ));
        }
        if self.prediction.horizons.is_empty() {
            return invalid("prediction.horizons must not be empty".into());
        }
        if self.prediction.horizons.contains(&0) || self.prediction.evaluation_horizon == 0 {
            return invalid("horizons must be >= 1 trading day".into());
        }
        let mut seen = self.prediction.horizons.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.prediction.horizons.len() {
            return invalid("prediction.horizons contains duplicates".into());
        }
        if self.plots.candle_days <= 0 {
            return invalid("plots.candle_days must be positive".into());
        }
        Ok(())
    }
}
