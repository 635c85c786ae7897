//! FFT-based Spectrum Analysis

use crate::FeatureError;
use ndarray::{Array2, ArrayView2};
use rustfft::{num_complex::Complex, FftPlanner};
use segmenter::{check_shape, Labels, NumericTable, SegmentError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// First `time_len / 2` DFT bin frequencies (Hz) of a signal sampled at
/// `sampling_freq`: the non-negative half of the standard bin sequence.
pub fn fft_freq_axis(time_len: usize, sampling_freq: f64) -> Vec<f64> {
    if time_len == 0 {
        return Vec::new();
    }
    let spacing = 1.0 / sampling_freq;
    let resolution = 1.0 / (time_len as f64 * spacing);
    (0..time_len / 2).map(|k| k as f64 * resolution).collect()
}

/// `desired_len` evenly spaced frequencies from `f_min` to `f_max` inclusive
pub fn zoomed_fft_freq_axis(f_min: f64, f_max: f64, desired_len: usize) -> Vec<f64> {
    match desired_len {
        0 => Vec::new(),
        1 => vec![f_min],
        n => {
            let step = (f_max - f_min) / (n - 1) as f64;
            let mut axis: Vec<f64> = (0..n).map(|i| i as f64 * step + f_min).collect();
            axis[n - 1] = f_max;
            axis
        }
    }
}

/// A magnitude spectrum paired with its frequency axis
#[derive(Debug, Clone, Copy)]
pub struct Spectrum<'a> {
    magnitude: &'a [f64],
    freq_axis: &'a [f64],
}

impl<'a> Spectrum<'a> {
    pub fn new(magnitude: &'a [f64], freq_axis: &'a [f64]) -> Result<Self, FeatureError> {
        if magnitude.len() != freq_axis.len() {
            return Err(FeatureError::SpectrumMismatch {
                magnitudes: magnitude.len(),
                frequencies: freq_axis.len(),
            });
        }
        Ok(Self {
            magnitude,
            freq_axis,
        })
    }

    pub fn magnitude(&self) -> &'a [f64] {
        self.magnitude
    }

    pub fn freq_axis(&self) -> &'a [f64] {
        self.freq_axis
    }

    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// `(magnitude, frequency)` pairs
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.magnitude.iter().copied().zip(self.freq_axis.iter().copied())
    }
}

/// Taper applied to each window before the transform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Taper {
    #[default]
    None,
    /// Hamming window to reduce spectral leakage
    Hamming,
}

/// One-sided magnitude spectra of every window of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumTable {
    magnitudes: Array2<f64>,
    freq_axis: Vec<f64>,
    labels: Labels,
}

impl SpectrumTable {
    pub fn freq_axis(&self) -> &[f64] {
        &self.freq_axis
    }

    pub fn magnitudes(&self) -> ArrayView2<'_, f64> {
        self.magnitudes.view()
    }

    /// Spectrum of window `index`
    pub fn spectrum(&self, index: usize) -> Option<Spectrum<'_>> {
        if index >= self.magnitudes.nrows() {
            return None;
        }
        let magnitude = self.magnitudes.row(index).to_slice()?;
        Some(Spectrum {
            magnitude,
            freq_axis: &self.freq_axis,
        })
    }

    pub fn len(&self) -> usize {
        self.magnitudes.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NumericTable for SpectrumTable {
    fn values(&self) -> ArrayView2<'_, f64> {
        self.magnitudes.view()
    }

    fn with_values(&self, values: Array2<f64>) -> Result<Self, SegmentError> {
        check_shape(self.magnitudes.dim(), values.dim())?;
        // spectrum() borrows rows as slices
        Ok(Self {
            magnitudes: values.as_standard_layout().into_owned(),
            freq_axis: self.freq_axis.clone(),
            labels: self.labels.clone(),
        })
    }

    fn label_columns(&self) -> Labels {
        self.labels.clone()
    }
}

/// Spectrum analyzer for frequency domain features
pub struct SpectrumAnalyzer {
    /// FFT planner for efficient computation
    planner: FftPlanner<f64>,
    /// Sampling frequency (Hz)
    sampling_freq: f64,
    taper: Taper,
}

impl SpectrumAnalyzer {
    /// Create a new analyzer for signals sampled at `sampling_freq` Hz
    pub fn new(sampling_freq: f64) -> Self {
        Self {
            planner: FftPlanner::new(),
            sampling_freq,
            taper: Taper::None,
        }
    }

    pub fn with_taper(mut self, taper: Taper) -> Self {
        self.taper = taper;
        self
    }

    /// Apply Hamming window to reduce spectral leakage
    fn apply_hamming_window(signal: &mut [f64]) {
        let n = signal.len();
        if n < 2 {
            return;
        }
        for (i, sample) in signal.iter_mut().enumerate() {
            let window =
                0.54 - 0.46 * (2.0 * std::f64::consts::PI * i as f64 / (n - 1) as f64).cos();
            *sample *= window;
        }
    }

    /// Unscaled magnitude `|X_k|` of the first `n / 2` bins
    pub fn magnitude(&mut self, window: &[f64]) -> Vec<f64> {
        let n = window.len();
        if n == 0 {
            return Vec::new();
        }

        let mut tapered = window.to_vec();
        if self.taper == Taper::Hamming {
            Self::apply_hamming_window(&mut tapered);
        }

        let mut buffer: Vec<Complex<f64>> =
            tapered.iter().map(|&v| Complex::new(v, 0.0)).collect();

        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        buffer.iter().take(n / 2).map(|c| c.norm()).collect()
    }

    /// Frequency axis matching [`SpectrumAnalyzer::magnitude`] for `win_len` samples
    pub fn freq_axis(&self, win_len: usize) -> Vec<f64> {
        fft_freq_axis(win_len, self.sampling_freq)
    }

    /// Transform every row of `table`, keeping row order and labels
    pub fn transform<T: NumericTable>(&mut self, table: &T) -> SpectrumTable {
        let values = table.values();
        let (rows, win_len) = values.dim();
        let bins = win_len / 2;

        let mut magnitudes = Array2::zeros((rows, bins));
        for (row, window) in values.rows().into_iter().enumerate() {
            let samples: Vec<f64> = window.iter().copied().collect();
            for (bin, magnitude) in self.magnitude(&samples).into_iter().enumerate() {
                magnitudes[[row, bin]] = magnitude;
            }
        }

        debug!(
            "Computed {} spectra of {} bins at fs={} Hz",
            rows, bins, self.sampling_freq
        );

        SpectrumTable {
            magnitudes,
            freq_axis: self.freq_axis(win_len),
            labels: table.label_columns(),
        }
    }
}
