//! Feature engineering: alignment, feature/label construction, tables.

pub mod align;
pub mod pipeline;
pub mod table;

pub use align::{inner_join, CombinedFrame};
pub use pipeline::{
    build_dataset, feature_columns, FeaturePipeline, PipelineError, CORRELATION_WINDOW,
    RETURN_LAGS, SMA_WINDOW,
};
pub use table::{Dataset, FeatureTable, LabelColumn};
