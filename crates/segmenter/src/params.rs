//! Mining Parameters

use crate::SegmentError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Window and hop length for one sampling rate.
///
/// Kept signed so values read from configuration are validated rather than
/// wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    pub win_len: i64,
    pub hop_len: i64,
}

impl WindowParams {
    pub fn new(win_len: i64, hop_len: i64) -> Self {
        Self { win_len, hop_len }
    }

    /// Validated `(win_len, hop_len)` as sample counts
    pub fn lengths(&self) -> Result<(usize, usize), SegmentError> {
        Ok((
            positive("win_len", self.win_len)?,
            positive("hop_len", self.hop_len)?,
        ))
    }
}

fn positive(name: &'static str, value: i64) -> Result<usize, SegmentError> {
    if value <= 0 {
        return Err(SegmentError::InvalidParameter { name, value });
    }
    usize::try_from(value).map_err(|_| SegmentError::InvalidParameter { name, value })
}

/// Mining parameters for a dataset.
///
/// Single-rate datasets use one `{win_len, hop_len}` pair; multi-rate
/// datasets key pairs by sampling frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MiningParams {
    Uniform(WindowParams),
    PerRate(BTreeMap<String, WindowParams>),
}

impl MiningParams {
    /// Parameters for a rate key as it appears in dataset metadata (`"48k"`, `"97656"`)
    pub fn for_rate(&self, key: &str) -> Result<WindowParams, SegmentError> {
        match self {
            MiningParams::Uniform(params) => Ok(*params),
            MiningParams::PerRate(rates) => rates
                .get(key)
                .copied()
                .ok_or_else(|| SegmentError::MissingRate(key.to_string())),
        }
    }

    /// Parameters for a numeric sampling frequency (Hz)
    pub fn resolve(&self, sampling_freq: f64) -> Result<WindowParams, SegmentError> {
        match self {
            MiningParams::Uniform(params) => Ok(*params),
            MiningParams::PerRate(rates) => rates
                .iter()
                .find(|(key, _)| key.trim().parse::<f64>().ok() == Some(sampling_freq))
                .map(|(_, params)| *params)
                .ok_or_else(|| SegmentError::MissingRate(sampling_freq.to_string())),
        }
    }
}

impl From<WindowParams> for MiningParams {
    fn from(params: WindowParams) -> Self {
        MiningParams::Uniform(params)
    }
}
