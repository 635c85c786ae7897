//! Numeric Table Capability

use crate::{Labels, SegmentError};
use ndarray::{Array2, ArrayView2};

/// A rectangular block of `f64` values, one row per window.
///
/// Implemented by the plain array representation (`Array2<f64>`) and by the
/// labelled table types, so scaling and extraction work on either.
pub trait NumericTable: Sized {
    /// Row-major view of the numeric values (label columns excluded)
    fn values(&self) -> ArrayView2<'_, f64>;

    /// Same table with its numeric block replaced; shape must not change
    fn with_values(&self, values: Array2<f64>) -> Result<Self, SegmentError>;

    /// Label columns broadcast over every row
    fn label_columns(&self) -> Labels {
        Labels::default()
    }

    fn n_rows(&self) -> usize {
        self.values().nrows()
    }

    fn n_cols(&self) -> usize {
        self.values().ncols()
    }
}

impl NumericTable for Array2<f64> {
    fn values(&self) -> ArrayView2<'_, f64> {
        self.view()
    }

    fn with_values(&self, values: Array2<f64>) -> Result<Self, SegmentError> {
        check_shape(self.dim(), values.dim())?;
        Ok(values)
    }
}

/// Verify a replacement block has the original shape
pub fn check_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<(), SegmentError> {
    if expected != actual {
        return Err(SegmentError::ShapeMismatch { expected, actual });
    }
    Ok(())
}
