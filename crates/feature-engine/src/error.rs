//! Feature Extraction Error Types

use segmenter::SegmentError;
use thiserror::Error;

/// Error type returned by feature functions and plugins
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors during feature extraction
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A feature function failed; the whole extraction is aborted
    #[error("Feature '{feature}' failed on row {row}: {source}")]
    Computation {
        feature: String,
        row: usize,
        #[source]
        source: BoxError,
    },

    /// A vector feature returned a different column layout than it declared
    #[error("Feature '{feature}' returned columns {actual:?} on row {row}, expected {expected:?}")]
    InconsistentOutput {
        feature: String,
        row: usize,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Two features would produce the same output column
    #[error("Duplicate feature column: {0}")]
    DuplicateColumn(String),

    /// Magnitude and frequency axis differ in length
    #[error("Spectrum length mismatch: {magnitudes} magnitudes, {frequencies} frequencies")]
    SpectrumMismatch { magnitudes: usize, frequencies: usize },

    /// Required feature argument absent or of the wrong kind
    #[error("Missing or invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Table(#[from] SegmentError),
}
