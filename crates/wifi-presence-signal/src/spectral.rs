//! Spectral summary of a one-dimensional signal.
//!
//! Informational companion to the time-domain pipeline: dominant
//! frequency and respiration-band power from an FFT magnitude spectrum.
//! Nothing in the verdict path depends on these values.

use num_complex::Complex;
use rustfft::FftPlanner;

use wifi_presence_core::types::SpectralFeatures;
use wifi_presence_core::{BREATHING_BAND_HIGH_HZ, BREATHING_BAND_LOW_HZ};

/// Compute spectral features over `signal` sampled at `sample_rate_hz`.
///
/// The dominant frequency is searched over the positive half of the
/// spectrum with DC excluded. Signals shorter than 4 samples yield an
/// all-zero result.
#[must_use]
pub fn spectral_features(signal: &[f64], sample_rate_hz: f64) -> SpectralFeatures {
    let n = signal.len();
    if n < 4 || sample_rate_hz <= 0.0 {
        return SpectralFeatures {
            dominant_frequency_hz: 0.0,
            breathing_band_power: 0.0,
            total_power: 0.0,
        };
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);

    let magnitude: Vec<f64> = buffer.iter().map(|c| c.norm()).collect();
    let bin_hz = sample_rate_hz / n as f64;

    // Positive-frequency half, DC excluded
    let half = n / 2;
    let dominant_bin = (1..half)
        .max_by(|&i, &j| magnitude[i].total_cmp(&magnitude[j]))
        .unwrap_or(0);

    let breathing_band_power = (1..half)
        .filter(|&i| {
            let f = i as f64 * bin_hz;
            (BREATHING_BAND_LOW_HZ..=BREATHING_BAND_HIGH_HZ).contains(&f)
        })
        .map(|i| magnitude[i])
        .sum();

    SpectralFeatures {
        dominant_frequency_hz: dominant_bin as f64 * bin_hz,
        breathing_band_power,
        total_power: magnitude.iter().sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_dominant_frequency_of_sine() {
        let fs = 20.0;
        let n = 600;
        let signal: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 0.25 * i as f64 / fs).sin())
            .collect();
        let features = spectral_features(&signal, fs);
        // Bin resolution is fs/n = 1/30 Hz
        assert!(
            (features.dominant_frequency_hz - 0.25).abs() < 0.05,
            "got {} Hz",
            features.dominant_frequency_hz
        );
        assert!(features.breathing_band_power > 0.0);
        assert!(features.total_power >= features.breathing_band_power);
    }

    #[test]
    fn test_out_of_band_sine_has_low_band_power() {
        let fs = 20.0;
        let n = 600;
        let signal: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 3.0 * i as f64 / fs).sin())
            .collect();
        let features = spectral_features(&signal, fs);
        assert!(features.breathing_band_power < 0.05 * features.total_power);
    }

    #[test]
    fn test_degenerate_inputs() {
        let features = spectral_features(&[1.0, 2.0], 20.0);
        assert_eq!(features.total_power, 0.0);
        let features = spectral_features(&[1.0; 100], 0.0);
        assert_eq!(features.total_power, 0.0);
    }
}
