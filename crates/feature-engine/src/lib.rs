//! Feature Engineering Engine
//!
//! Canonical time and frequency domain features for bearing vibration
//! windows, an ordered feature registry, and the extractor that turns a window
//! table into a feature table.

mod characteristics;
mod error;
mod features;
mod fft;
pub mod spectral;
pub mod statistics;

pub use characteristics::{
    CanonicalCharacteristics, DescriptiveCharacteristics, NamedValues, ADDITIONAL_NAMES,
};
pub use error::{BoxError, FeatureError};
pub use features::{
    apply, FeatureArg, FeatureArgs, FeatureExtractor, FeatureOutput, FeatureSet, FeatureSpec,
    FeatureTable,
};
pub use fft::{
    fft_freq_axis, zoomed_fft_freq_axis, Spectrum, SpectrumAnalyzer, SpectrumTable, Taper,
};
pub use statistics::StatisticalFeatures;
