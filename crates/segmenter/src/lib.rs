//! Window Segmentation
//!
//! Slices raw vibration recordings into fixed-length windows and carries the
//! label metadata broadcast onto every window of a recording.

mod error;
mod params;
mod table;
mod window;

pub use error::SegmentError;
pub use params::{MiningParams, WindowParams};
pub use table::{check_shape, NumericTable};
pub use window::{segment, segment_as, window_count, OutputFormat, Segments, WindowTable};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw recording as produced by a dataset miner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSignal {
    samples: Vec<f64>,
    sampling_freq: f64,
}

impl RawSignal {
    /// Wrap samples recorded at `sampling_freq` Hz
    pub fn new(samples: Vec<f64>, sampling_freq: f64) -> Self {
        Self {
            samples,
            sampling_freq,
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sampling frequency (Hz)
    pub fn sampling_freq(&self) -> f64 {
        self.sampling_freq
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Value of a single label column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Number(v) => write!(f, "{}", v),
            LabelValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for LabelValue {
    fn from(value: f64) -> Self {
        LabelValue::Number(value)
    }
}

impl From<i64> for LabelValue {
    fn from(value: i64) -> Self {
        LabelValue::Number(value as f64)
    }
}

impl From<&str> for LabelValue {
    fn from(value: &str) -> Self {
        LabelValue::Text(value.to_string())
    }
}

impl From<String> for LabelValue {
    fn from(value: String) -> Self {
        LabelValue::Text(value)
    }
}

/// Insertion-ordered label columns (state, severity, load, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Labels(Vec<(String, LabelValue)>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, replacing the value in place if the key already exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<LabelValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder-style [`Labels::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<LabelValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&LabelValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
