//! Pricecast Core: market data, feature pipeline, gradient-boosted classifier.
//!
//! This crate contains everything below the application layer:
//! - Domain types (bars, price series, ticker metadata)
//! - Data providers (Yahoo Finance, CSV import, in-memory, synthetic) and
//!   the per-ticker manager that fronts them
//! - Windowed primitives (rolling aggregates, shifts, percent change)
//! - Feature and label construction for one target/factor pair
//! - Boosted decision-tree classifier, chronological split, metrics

pub mod data;
pub mod domain;
pub mod features;
pub mod model;
pub mod window;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared with the application layer are
    /// Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::TickerInfo>();
        require_sync::<domain::TickerInfo>();

        require_send::<data::TickerManager>();
        require_sync::<data::TickerManager>();
        require_send::<features::FeaturePipeline>();
        require_sync::<features::FeaturePipeline>();
        require_send::<features::Dataset>();
        require_sync::<features::Dataset>();

        require_send::<model::GradientBoostedClassifier>();
        require_sync::<model::GradientBoostedClassifier>();
        require_send::<model::ClassificationReport>();
        require_sync::<model::ClassificationReport>();
    }

    /// Architecture contract: the feature pipeline cannot see the model.
    ///
    /// `build_dataset` takes only price series and a horizon; if it ever needs
    /// a classifier argument, this stops compiling.
    #[test]
    fn pipeline_signature_has_no_model_parameter() {
        fn _check(
            t: &domain::PriceSeries,
            f: &domain::PriceSeries,
        ) -> Result<features::Dataset, features::PipelineError> {
            features::build_dataset(t, f, 1)
        }
    }
}
