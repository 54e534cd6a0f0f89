//! Evaluation session: the model behind the evaluation charts.
//!
//! Holds at most one trained model. Training again replaces it; a prediction
//! run clears it so charts never show a model older than the latest run.

use crate::trainer::TrainedModel;

#[derive(Debug, Default)]
pub struct EvaluationSession {
    model: Option<TrainedModel>,
}

impl EvaluationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly trained model, dropping any earlier one.
    pub fn install(&mut self, model: TrainedModel) -> &TrainedModel {
        if let Some(old) = &self.model {
            tracing::debug!(horizon = old.horizon, "replacing evaluation model");
        }
        self.model.insert(model)
    }

    pub fn invalidate(&mut self) {
        if self.model.take().is_some() {
            tracing::debug!("evaluation model cleared");
        }
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::trainer::train_on_dataset;
    use pricecast_core::data::synthetic_pair;
    use pricecast_core::features::build_dataset;

    fn model(horizon: usize) -> TrainedModel {
        let (t, f) = synthetic_pair("AAPL", "SMH", 200);
        let ds = build_dataset(&t, &f, horizon).unwrap();
        let config = ModelConfig {
            n_estimators: 5,
            max_depth: 2,
            ..ModelConfig::default()
        };
        train_on_dataset(&ds, &config).unwrap()
    }

    #[test]
    fn starts_empty() {
        let session = EvaluationSession::new();
        assert!(!session.is_ready());
        assert!(session.model().is_none());
    }

    #[test]
    fn install_replaces_and_invalidate_clears() {
        let mut session = EvaluationSession::new();
        session.install(model(5));
        assert_eq!(session.model().map(|m| m.horizon), Some(5));

        session.install(model(1));
        assert_eq!(session.model().map(|m| m.horizon), Some(1));

        session.invalidate();
        assert!(!session.is_ready());
        session.invalidate();
        assert!(!session.is_ready());
    }
}
