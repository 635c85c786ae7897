//! Segmentation Error Types

use thiserror::Error;

/// Errors raised while segmenting a recording
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentError {
    /// Window or hop length is not a positive integer
    #[error("Invalid parameter {name}: {value} (must be > 0)")]
    InvalidParameter { name: &'static str, value: i64 },

    /// Representation name not recognized
    #[error("Unsupported table representation: {0}")]
    UnsupportedType(String),

    /// Table values do not match the shape they are replacing
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// No window parameters configured for a sampling frequency
    #[error("No window parameters for sampling frequency {0}")]
    MissingRate(String),
}
