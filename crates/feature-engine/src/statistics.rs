//! Time Domain Features

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    sum / n as f64
}

/// Root mean square: `sqrt(mean(x^2))`
pub fn rms(x: &[f64]) -> f64 {
    mean(x.iter().map(|v| v * v)).sqrt()
}

/// Largest absolute sample
pub fn peak(x: &[f64]) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    x.iter().fold(f64::NEG_INFINITY, |acc, v| acc.max(v.abs()))
}

/// Squared mean of square roots of absolute amplitude
pub fn smsa(x: &[f64]) -> f64 {
    let m = mean(x.iter().map(|v| v.abs().sqrt()));
    m * m
}

pub fn crest_factor(x: &[f64]) -> f64 {
    peak(x) / rms(x)
}

pub fn clearance_factor(x: &[f64]) -> f64 {
    peak(x) / smsa(x)
}

pub fn shape_factor(x: &[f64]) -> f64 {
    rms(x) / mean(x.iter().map(|v| v.abs()))
}

pub fn impulse_factor(x: &[f64]) -> f64 {
    peak(x) / mean(x.iter().map(|v| v.abs()))
}

/// Moment and shape statistics of one window
#[derive(Debug, Clone, Default)]
pub struct StatisticalFeatures {
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub skewness: f64,
    /// Excess kurtosis; impacts from a damaged race push it well above 0
    pub kurtosis: f64,
    pub min: f64,
    pub max: f64,
    /// Mean absolute difference between consecutive samples
    pub rate_of_change: f64,
    /// Sign changes of the window around its own mean
    pub mean_crossings: usize,
}

impl StatisticalFeatures {
    /// All-zero statistics for an empty window
    pub fn compute(window: &[f64]) -> Self {
        if window.is_empty() {
            return Self::default();
        }

        let n = window.len() as f64;
        let avg = mean(window.iter().copied());
        let min = window.iter().copied().fold(f64::INFINITY, f64::min);
        let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let (m2, m3, m4) = window.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), &v| {
            let d = v - avg;
            let d2 = d * d;
            (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
        });
        let variance = m2 / n;
        let std_dev = variance.sqrt();

        let (skewness, kurtosis) = if std_dev > 0.0 {
            (
                (m3 / n) / (variance * std_dev),
                (m4 / n) / (variance * variance) - 3.0,
            )
        } else {
            (0.0, 0.0)
        };

        let rate_of_change = if window.len() > 1 {
            mean(window.windows(2).map(|pair| (pair[1] - pair[0]).abs()))
        } else {
            0.0
        };

        let mean_crossings = window
            .windows(2)
            .filter(|pair| (pair[0] - avg) * (pair[1] - avg) < 0.0)
            .count();

        Self {
            mean: avg,
            std_dev,
            skewness,
            kurtosis,
            min,
            max,
            rate_of_change,
            mean_crossings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rms_of_ramp() {
        assert!((rms(&[0.0, 1.0, 2.0, 3.0]) - 3.5f64.sqrt()).abs() < 1e-12);
        assert!((rms(&[0.0, 1.0, 2.0, 3.0]) - 1.8708).abs() < 1e-4);
    }

    #[test]
    fn test_peak_uses_absolute_value() {
        assert_eq!(peak(&[1.0, -4.0, 3.0]), 4.0);
        assert!(peak(&[]).is_nan());
    }

    #[test]
    fn test_smsa() {
        // mean(sqrt([1, 4, 9])) = 2
        assert!((smsa(&[1.0, -4.0, 9.0]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_factors_of_square_wave() {
        let x = [1.0, -1.0, 1.0, -1.0];
        assert!((crest_factor(&x) - 1.0).abs() < 1e-12);
        assert!((shape_factor(&x) - 1.0).abs() < 1e-12);
        assert!((impulse_factor(&x) - 1.0).abs() < 1e-12);
        assert!((clearance_factor(&x) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_factor_ordering_for_spiky_signal() {
        let x = [0.1, 0.2, 5.0, 0.1, -0.3, 0.2];
        assert!(crest_factor(&x) > 1.0);
        assert!(impulse_factor(&x) >= crest_factor(&x));
        assert!(clearance_factor(&x) >= impulse_factor(&x));
    }

    /// Two periods of a sine sampled half a step off its zeros
    fn sine_window(amplitude: f64) -> Vec<f64> {
        (0..64)
            .map(|i| amplitude * (2.0 * std::f64::consts::PI * (i as f64 + 0.5) / 32.0).sin())
            .collect()
    }

    #[test]
    fn test_sine_window_moments() {
        let stats = StatisticalFeatures::compute(&sine_window(2.0));

        assert!(stats.mean.abs() < 1e-12);
        assert!((stats.std_dev - 2.0 / 2f64.sqrt()).abs() < 1e-12);
        assert!(stats.skewness.abs() < 1e-9);
        assert!((stats.kurtosis + 1.5).abs() < 1e-9);
        assert_eq!(stats.mean_crossings, 3);
        assert!(stats.max <= 2.0 && stats.min >= -2.0);
    }

    #[test]
    fn test_impact_raises_kurtosis() {
        let mut window = vec![0.0; 16];
        window[5] = 1.0;
        let stats = StatisticalFeatures::compute(&window);

        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 1.0);
        assert!(stats.skewness > 0.0);
        assert!(stats.kurtosis > 3.0);
        assert_eq!(stats.mean_crossings, 2);
        assert!((stats.rate_of_change - 2.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_window_has_no_shape() {
        let stats = StatisticalFeatures::compute(&[0.25; 8]);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.kurtosis, 0.0);
        assert_eq!(stats.mean_crossings, 0);
    }

    #[test]
    fn test_empty_window_statistics_are_zero() {
        let stats = StatisticalFeatures::compute(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.mean_crossings, 0);
    }

    proptest! {
        #[test]
        fn prop_rms_of_constant(c in -1.0e3f64..1.0e3, n in 1usize..128) {
            let x = vec![c; n];
            prop_assert!((rms(&x) - c.abs()).abs() <= 1e-9 * c.abs().max(1.0));
        }

        #[test]
        fn prop_crest_factor_above_one(
            x in prop::collection::vec(-10.0f64..10.0, 2..64)
        ) {
            let spread = x.iter().fold(f64::NEG_INFINITY, |a, &v| a.max(v))
                - x.iter().fold(f64::INFINITY, |a, &v| a.min(v));
            prop_assume!(spread > 1e-3);
            prop_assert!(crest_factor(&x) >= 1.0);
        }
    }
}
