//! Canonical Time-Series Characteristics
//!
//! Plugin seam for external characteristic libraries that return a fixed,
//! named block of statistics per window.

use crate::statistics::StatisticalFeatures;
use crate::{BoxError, FeatureArgs};

/// Columns appended after a plugin's own block when additionals are enabled
pub const ADDITIONAL_NAMES: [&str; 2] = ["DN_Mean", "DN_Spread_Std"];

/// Ordered names with one value each
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedValues {
    pub names: Vec<String>,
    pub values: Vec<f64>,
}

impl NamedValues {
    pub fn new(names: Vec<String>, values: Vec<f64>) -> Self {
        Self { names, values }
    }

    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.names.push(name.into());
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A library of generic descriptors computed on raw window samples.
///
/// `names` must list exactly the names `characterize` returns, in order, for
/// every window. `args` are the arguments registered on the owning feature.
pub trait CanonicalCharacteristics: Send + Sync {
    fn names(&self) -> Vec<String>;

    fn characterize(&self, window: &[f64], args: &FeatureArgs) -> Result<NamedValues, BoxError>;
}

/// Mean and population standard deviation of a window
pub fn additionals(window: &[f64]) -> [f64; 2] {
    let stats = StatisticalFeatures::compute(window);
    [stats.mean, stats.std_dev]
}

/// Moment and shape statistics built on [`StatisticalFeatures`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptiveCharacteristics;

impl DescriptiveCharacteristics {
    const NAMES: [&'static str; 8] = [
        "mean",
        "std_dev",
        "skewness",
        "kurtosis",
        "min",
        "max",
        "rate_of_change",
        "mean_crossings",
    ];
}

impl CanonicalCharacteristics for DescriptiveCharacteristics {
    fn names(&self) -> Vec<String> {
        Self::NAMES.iter().map(|s| s.to_string()).collect()
    }

    fn characterize(&self, window: &[f64], _args: &FeatureArgs) -> Result<NamedValues, BoxError> {
        if window.is_empty() {
            return Err("cannot characterize an empty window".into());
        }
        let stats = StatisticalFeatures::compute(window);
        Ok(NamedValues::new(
            self.names(),
            vec![
                stats.mean,
                stats.std_dev,
                stats.skewness,
                stats.kurtosis,
                stats.min,
                stats.max,
                stats.rate_of_change,
                stats.mean_crossings as f64,
            ],
        ))
    }
}
