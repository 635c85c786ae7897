//! Window Scaling
//!
//! Z-score normalization of window tables, either per window (whitening each
//! waveform) or per sample position (whitening across the window population).

mod error;
mod normalizer;

pub use error::ScaleError;
pub use normalizer::{z_score, ScaleAxis, ZScoreScaler, DEFAULT_EPS};
