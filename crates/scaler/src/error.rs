//! Scaling Error Types

use segmenter::SegmentError;
use thiserror::Error;

/// Errors during table scaling
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    /// Axis outside {0, 1}
    #[error("Invalid parameter axis: {0} (must be 0 for columns or 1 for rows)")]
    InvalidAxis(i64),

    /// Table could not take the scaled values
    #[error(transparent)]
    Table(#[from] SegmentError),
}
