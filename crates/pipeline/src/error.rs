//! Pipeline Error Types

use feature_engine::FeatureError;
use scaler::ScaleError;
use segmenter::SegmentError;
use thiserror::Error;

/// Errors from any stage of the mining pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Segmentation failed: {0}")]
    Segment(#[from] SegmentError),

    #[error("Scaling failed: {0}")]
    Scale(#[from] ScaleError),

    #[error("Feature extraction failed: {0}")]
    Feature(#[from] FeatureError),

    /// Configuration could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A global tracing subscriber is already installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
