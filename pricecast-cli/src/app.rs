//! Application context shared by the menu and the one-shot commands.

use anyhow::{anyhow, Context, Result};
use pricecast_core::data::{DataProvider, TickerManager};
use pricecast_core::domain::TickerInfo;
use pricecast_core::features::FeaturePipeline;
use pricecast_runner::{
    run_predictions, train_model, AppConfig, EvaluationSession, PredictError, PredictionReport,
    TrainError, TrainedModel,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::plots::{self, overlay::OverlayData};

/// Charts drawn from a trained model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalChart {
    Importance,
    Confusion,
    Overlay,
}

impl EvalChart {
    fn file_stem(self, horizon: usize) -> String {
        match self {
            EvalChart::Importance => format!("importance_{horizon}d"),
            EvalChart::Confusion => format!("confusion_{horizon}d"),
            EvalChart::Overlay => format!("overlay_{horizon}d"),
        }
    }
}

pub struct App {
    config: AppConfig,
    provider: Arc<dyn DataProvider>,
    pipeline: FeaturePipeline,
    session: EvaluationSession,
}

impl App {
    pub fn new(config: AppConfig, provider: Arc<dyn DataProvider>) -> Self {
        let lookback = config.data.lookback();
        let target = TickerManager::new(config.tickers.target.clone(), lookback, provider.clone());
        let factor = TickerManager::new(config.tickers.factor.clone(), lookback, provider.clone());
        Self {
            config,
            provider,
            pipeline: FeaturePipeline::new(target, factor),
            session: EvaluationSession::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &EvaluationSession {
        &self.session
    }

    pub fn target_symbol(&self) -> &str {
        self.pipeline.target().symbol()
    }

    pub fn factor_symbol(&self) -> &str {
        self.pipeline.factor().symbol()
    }

    /// Manager for any symbol, sharing the configured provider and lookback.
    pub fn manager(&self, symbol: &str) -> TickerManager {
        TickerManager::new(symbol, self.config.data.lookback(), self.provider.clone())
    }

    pub fn train(&self, horizon: usize) -> Result<TrainedModel, TrainError> {
        train_model(&self.pipeline, horizon, &self.config.model)
    }

    /// Train the evaluation-horizon model and keep it for the charts. The
    /// previous model is dropped first, so a failed retrain leaves none.
    pub fn train_evaluation_model(&mut self) -> Result<&TrainedModel, TrainError> {
        self.session.invalidate();
        let model = self.train(self.config.prediction.evaluation_horizon)?;
        Ok(self.session.install(model))
    }

    /// Run the multi-horizon prediction and log it. The evaluation model is
    /// cleared afterwards whatever the outcome.
    pub fn predict(&mut self) -> Result<PredictionReport, PredictError> {
        let result = run_predictions(&self.pipeline, self.pipeline.target(), &self.config);
        self.session.invalidate();
        result
    }

    pub fn ticker_info(&self, symbol: &str) -> Option<TickerInfo> {
        self.manager(symbol).load_info()
    }

    pub fn plot_candles(&self, symbol: &str) -> Result<PathBuf> {
        let series = self
            .manager(symbol)
            .load_prices()
            .ok_or_else(|| anyhow!("price data unavailable for {symbol}"))?;
        let path = plots::png_path(&self.config.plots.output_dir, &format!("candles_{symbol}"))
            .context("create plot directory")?;
        plots::draw_candles(&series, self.config.plots.candle_days, &path)
            .map_err(|e| anyhow!("candlestick chart for {symbol}: {e}"))?;
        Ok(path)
    }

    /// Draw a chart from the session's evaluation model.
    pub fn plot_evaluation(&self, chart: EvalChart) -> Result<PathBuf> {
        let model = self
            .session
            .model()
            .ok_or_else(|| anyhow!("no evaluation model; train one first"))?;
        self.plot_model(chart, model)
    }

    pub fn plot_model(&self, chart: EvalChart, model: &TrainedModel) -> Result<PathBuf> {
        let path = plots::png_path(&self.config.plots.output_dir, &chart.file_stem(model.horizon))
            .context("create plot directory")?;
        let drawn = match chart {
            EvalChart::Importance => plots::draw_importance(
                &model.classifier.feature_importance(),
                model.horizon,
                &path,
            ),
            EvalChart::Confusion => {
                plots::draw_confusion(&model.report.confusion, model.horizon, &path)
            }
            EvalChart::Overlay => {
                let data = OverlayData {
                    dates: model.holdout.dates(),
                    prices: &model.holdout.target_close,
                    actual: &model.holdout.actual,
                    predicted: &model.holdout.predicted,
                };
                plots::draw_overlay(&data, self.target_symbol(), model.horizon, &path)
            }
        };
        drawn.map_err(|e| anyhow!("{chart:?} chart: {e}"))?;
        Ok(path)
    }
}
