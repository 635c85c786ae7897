//! Z-Score Normalization

use crate::ScaleError;
use ndarray::ArrayViewMut1;
use segmenter::NumericTable;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Substitute for a zero standard deviation
pub const DEFAULT_EPS: f64 = 1e-10;

/// Direction along which statistics are taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ScaleAxis {
    /// Axis 0: each column (sample position) across all windows
    Columns,
    /// Axis 1: each row (window) independently
    Rows,
}

impl TryFrom<i64> for ScaleAxis {
    type Error = ScaleError;

    fn try_from(axis: i64) -> Result<Self, Self::Error> {
        match axis {
            0 => Ok(ScaleAxis::Columns),
            1 => Ok(ScaleAxis::Rows),
            other => Err(ScaleError::InvalidAxis(other)),
        }
    }
}

impl From<ScaleAxis> for i64 {
    fn from(axis: ScaleAxis) -> Self {
        match axis {
            ScaleAxis::Columns => 0,
            ScaleAxis::Rows => 1,
        }
    }
}

/// Z-score scaler with a fixed axis and epsilon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScoreScaler {
    pub axis: ScaleAxis,
    #[serde(default = "default_eps")]
    pub eps: f64,
}

fn default_eps() -> f64 {
    DEFAULT_EPS
}

impl ZScoreScaler {
    pub fn new(axis: ScaleAxis) -> Self {
        Self {
            axis,
            eps: DEFAULT_EPS,
        }
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Scale `table`, returning the same representation
    pub fn scale<T: NumericTable>(&self, table: &T) -> Result<T, ScaleError> {
        let mut values = table.values().to_owned();

        match self.axis {
            ScaleAxis::Rows => values
                .rows_mut()
                .into_iter()
                .for_each(|lane| standardize(lane, self.eps)),
            ScaleAxis::Columns => values
                .columns_mut()
                .into_iter()
                .for_each(|lane| standardize(lane, self.eps)),
        }

        debug!(
            "Z-scored {}x{} table along {:?}",
            values.nrows(),
            values.ncols(),
            self.axis
        );

        Ok(table.with_values(values)?)
    }
}

/// Z-score `table` along `axis` (0 = columns, 1 = rows).
///
/// Uses the population standard deviation; a deviation of exactly zero is
/// replaced by `eps`.
pub fn z_score<T: NumericTable>(table: &T, axis: i64, eps: f64) -> Result<T, ScaleError> {
    let axis = ScaleAxis::try_from(axis)?;
    ZScoreScaler::new(axis).with_eps(eps).scale(table)
}

fn standardize(mut lane: ArrayViewMut1<'_, f64>, eps: f64) {
    let n = lane.len();
    if n == 0 {
        return;
    }

    let mean = lane.sum() / n as f64;
    let variance = lane.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    let std_dev = match variance.sqrt() {
        s if s == 0.0 => eps,
        s => s,
    };

    lane.mapv_inplace(|v| (v - mean) / std_dev);
}
