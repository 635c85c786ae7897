//! Frequency Domain Features
//!
//! Spectral shape descriptors over a magnitude spectrum `S` and its frequency
//! axis `f`. P17..P24 follow the numbering of the classic bearing-diagnosis
//! feature tables.

use crate::fft::Spectrum;

fn weighted_sum(spectrum: &Spectrum<'_>, g: impl Fn(f64) -> f64) -> f64 {
    spectrum.bins().map(|(s, f)| g(f) * s).sum()
}

fn weighted_mean(spectrum: &Spectrum<'_>, g: impl Fn(f64) -> f64) -> f64 {
    weighted_sum(spectrum, g) / spectrum.len() as f64
}

/// `sum(S·f) / sum(S)`
pub fn spectral_centroid(spectrum: &Spectrum<'_>) -> f64 {
    weighted_sum(spectrum, |f| f) / weighted_sum(spectrum, |_| 1.0)
}

/// Spread around the centroid: `sqrt(mean((f - centroid)^2 · S))`
pub fn p17(spectrum: &Spectrum<'_>) -> f64 {
    let centroid = spectral_centroid(spectrum);
    weighted_mean(spectrum, |f| (f - centroid) * (f - centroid)).sqrt()
}

/// `sqrt(sum(f^2·S) / sum(S))`
pub fn p18(spectrum: &Spectrum<'_>) -> f64 {
    (weighted_sum(spectrum, |f| f * f) / weighted_sum(spectrum, |_| 1.0)).sqrt()
}

/// `sum(f^4·S) / sum(f^2·S)`
pub fn p19(spectrum: &Spectrum<'_>) -> f64 {
    weighted_sum(spectrum, |f| f.powf(4.0)) / weighted_sum(spectrum, |f| f * f)
}

/// `sum(f^2·S) / sqrt(sum(S) · sum(f^4·S))`
pub fn p20(spectrum: &Spectrum<'_>) -> f64 {
    weighted_sum(spectrum, |f| f * f)
        / (weighted_sum(spectrum, |_| 1.0) * weighted_sum(spectrum, |f| f.powf(4.0))).sqrt()
}

/// `P17 / centroid`
pub fn p21(spectrum: &Spectrum<'_>) -> f64 {
    p17(spectrum) / spectral_centroid(spectrum)
}

/// `mean((f - centroid)^3 · S) / P17^3`
pub fn p22(spectrum: &Spectrum<'_>) -> f64 {
    let centroid = spectral_centroid(spectrum);
    weighted_mean(spectrum, |f| (f - centroid).powf(3.0)) / p17(spectrum).powf(3.0)
}

/// `mean((f - centroid)^4 · S) / P17^4`
pub fn p23(spectrum: &Spectrum<'_>) -> f64 {
    let centroid = spectral_centroid(spectrum);
    weighted_mean(spectrum, |f| (f - centroid).powf(4.0)) / p17(spectrum).powf(4.0)
}

/// `mean(sqrt(f - centroid) · S) / sqrt(P17)`
///
/// Every bin below the centroid takes the square root of a negative number,
/// so the result is NaN whenever such a bin exists, even at zero magnitude.
pub fn p24(spectrum: &Spectrum<'_>) -> f64 {
    let centroid = spectral_centroid(spectrum);
    weighted_mean(spectrum, |f| (f - centroid).sqrt()) / p17(spectrum).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FREQS: [f64; 4] = [0.0, 10.0, 20.0, 30.0];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_centroid_of_single_line() {
        let magnitude = [0.0, 0.0, 5.0, 0.0];
        let spectrum = Spectrum::new(&magnitude, &FREQS).unwrap();
        assert!(close(spectral_centroid(&spectrum), 20.0));
        assert!(close(p18(&spectrum), 20.0));
        assert!(close(p19(&spectrum), 400.0));
        assert!(close(p20(&spectrum), 1.0));
        assert_eq!(p17(&spectrum), 0.0);
    }

    #[test]
    fn test_flat_spectrum_moments() {
        let magnitude = [1.0; 4];
        let spectrum = Spectrum::new(&magnitude, &FREQS).unwrap();

        // centroid 15, deviations ±5, ±15
        assert!(close(spectral_centroid(&spectrum), 15.0));
        let spread = ((225.0 + 25.0 + 25.0 + 225.0) / 4.0f64).sqrt();
        assert!(close(p17(&spectrum), spread));
        assert!(close(p18(&spectrum), (1400.0f64 / 4.0).sqrt()));
        assert!(close(p19(&spectrum), 980000.0 / 1400.0));
        assert!(close(p20(&spectrum), 1400.0 / (4.0f64 * 980000.0).sqrt()));
        assert!(close(p21(&spectrum), spread / 15.0));
        // symmetric around the centroid
        assert!(p22(&spectrum).abs() < 1e-9);
        let fourth = (50625.0 + 625.0 + 625.0 + 50625.0) / 4.0;
        assert!(close(p23(&spectrum), fourth / spread.powi(4)));
    }

    #[test]
    fn test_p24_nan_below_centroid() {
        let magnitude = [1.0; 4];
        let spectrum = Spectrum::new(&magnitude, &FREQS).unwrap();
        assert!(p24(&spectrum).is_nan());
    }

    #[test]
    fn test_p24_single_line_is_zero_over_zero() {
        // bins below the centroid contribute 0 · NaN, the spread is 0
        let magnitude = [0.0, 0.0, 0.0, 2.0];
        let spectrum = Spectrum::new(&magnitude, &FREQS).unwrap();
        assert!(p24(&spectrum).is_nan());
    }
}
