//! Band-limited respiration signal extraction and breathing features.
//!
//! An [`AmplitudeFrame`] is reduced to a single time series (subcarrier
//! mean per sample), normalized to zero mean and unit scale, then bandpass
//! filtered to the 0.1-0.5 Hz adult respiration band with zero phase
//! shift. Features over that series (in-band variance, mean absolute
//! amplitude, peak count) corroborate the breathing classification.

use tracing::debug;

use wifi_presence_core::error::SignalError;
use wifi_presence_core::types::{AmplitudeFrame, BreathingFeatures, BreathingSignal};
use wifi_presence_core::utils::{mean, normalize, variance};
use wifi_presence_core::{
    BREATHING_BAND_HIGH_HZ, BREATHING_BAND_LOW_HZ, DEFAULT_SAMPLE_RATE_HZ,
};

use crate::filter::BandpassFilter;

/// Configuration for [`BreathingExtractor`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BreathingExtractorConfig {
    /// Sampling rate of incoming frames, in Hz.
    pub sample_rate_hz: f64,
    /// Low band edge in Hz.
    pub band_low_hz: f64,
    /// High band edge in Hz.
    pub band_high_hz: f64,
    /// Butterworth prototype order.
    pub filter_order: usize,
    /// Below this many samples the filter is skipped and the normalized
    /// series is returned as-is; the filter has no stable operating region
    /// on shorter windows.
    pub min_filter_samples: usize,
    /// Minimum spacing between counted peaks, in seconds. The 0.5 s
    /// default caps the detectable rate at 120 BPM.
    pub min_peak_distance_secs: f64,
}

impl Default for BreathingExtractorConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            band_low_hz: BREATHING_BAND_LOW_HZ,
            band_high_hz: BREATHING_BAND_HIGH_HZ,
            filter_order: 4,
            min_filter_samples: 15,
            min_peak_distance_secs: 0.5,
        }
    }
}

/// Reduces amplitude frames to band-limited respiration waveforms.
#[derive(Debug, Clone)]
pub struct BreathingExtractor {
    config: BreathingExtractorConfig,
    filter: BandpassFilter,
}

impl BreathingExtractor {
    /// Create an extractor, designing the bandpass filter up front.
    pub fn new(config: BreathingExtractorConfig) -> Result<Self, SignalError> {
        let filter = BandpassFilter::butterworth(
            config.filter_order,
            config.band_low_hz,
            config.band_high_hz,
            config.sample_rate_hz,
        )?;
        Ok(Self { config, filter })
    }

    /// Create an extractor with default band edges at the given rate.
    pub fn with_sample_rate(sample_rate_hz: f64) -> Result<Self, SignalError> {
        Self::new(BreathingExtractorConfig {
            sample_rate_hz,
            ..BreathingExtractorConfig::default()
        })
    }

    /// Minimum inter-peak spacing in samples.
    #[must_use]
    pub fn min_peak_distance_samples(&self) -> usize {
        ((self.config.min_peak_distance_secs * self.config.sample_rate_hz) as usize).max(1)
    }

    /// Extract the band-limited respiration waveform from a frame.
    ///
    /// Pure function of the frame: same input, same output. An empty frame
    /// yields an empty signal; a window shorter than the filter's minimum
    /// yields the normalized but unfiltered series. Output length always
    /// equals the frame's sample count.
    #[must_use]
    pub fn extract_signal(&self, frame: &AmplitudeFrame) -> BreathingSignal {
        if frame.is_empty() {
            return Vec::new();
        }

        // Collapse subcarriers: mean amplitude per time sample.
        let matrix = frame.matrix();
        let series: Vec<f64> = matrix
            .rows()
            .into_iter()
            .map(|row| mean(&row.to_vec()))
            .collect();

        let normalized = normalize(&series);

        if normalized.len() < self.config.min_filter_samples {
            debug!(
                samples = normalized.len(),
                min = self.config.min_filter_samples,
                "window too short for bandpass filter, returning unfiltered series"
            );
            return normalized;
        }

        self.filter.apply_zero_phase(&normalized)
    }

    /// Extract breathing features from a frame.
    #[must_use]
    pub fn extract_features(&self, frame: &AmplitudeFrame) -> BreathingFeatures {
        let breathing_signal = self.extract_signal(frame);
        let peak_indices = find_peaks(&breathing_signal, self.min_peak_distance_samples());
        let mean_amplitude = mean(
            &breathing_signal
                .iter()
                .map(|v| v.abs())
                .collect::<Vec<f64>>(),
        );
        BreathingFeatures {
            variance: variance(&breathing_signal),
            mean_amplitude,
            num_peaks: peak_indices.len(),
            breathing_signal,
            peak_indices,
        }
    }
}

/// Locate local maxima separated by at least `min_distance` samples.
///
/// Plateaus count once, at their midpoint. When two maxima fall closer
/// than `min_distance`, the taller one wins; this is what keeps noise
/// wiggles from being counted as separate breaths.
#[must_use]
pub fn find_peaks(signal: &[f64], min_distance: usize) -> Vec<usize> {
    let n = signal.len();
    if n < 3 {
        return Vec::new();
    }

    // All strict local maxima, plateau-aware.
    let mut candidates: Vec<usize> = Vec::new();
    let mut i = 1;
    while i < n - 1 {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < n - 1 && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                candidates.push((i + ahead - 1) / 2);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }

    if min_distance <= 1 || candidates.len() < 2 {
        return candidates;
    }

    // Enforce spacing, tallest-first.
    let mut by_height = candidates.clone();
    by_height.sort_by(|&a, &b| signal[b].total_cmp(&signal[a]));
    let mut keep = vec![true; n];
    let mut kept: Vec<usize> = Vec::new();
    for idx in by_height {
        if !keep[idx] {
            continue;
        }
        kept.push(idx);
        let lo = idx.saturating_sub(min_distance - 1);
        let hi = (idx + min_distance).min(n);
        for slot in keep.iter_mut().take(hi).skip(lo) {
            *slot = false;
        }
    }
    kept.sort_unstable();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use std::f64::consts::PI;

    /// 30-subcarrier frame carrying a shared sinusoid plus a small
    /// deterministic per-subcarrier offset.
    fn breathing_frame(freq_hz: f64, fs: f64, secs: f64) -> AmplitudeFrame {
        let n = (fs * secs) as usize;
        let subcarriers = 30;
        let mut data = Array2::zeros((n, subcarriers));
        for t in 0..n {
            let value = 1.0 + 0.5 * (2.0 * PI * freq_hz * t as f64 / fs).sin();
            for s in 0..subcarriers {
                data[[t, s]] = value + 0.01 * (s as f64 / subcarriers as f64 - 0.5);
            }
        }
        AmplitudeFrame::new(data)
    }

    #[test]
    fn test_empty_frame_empty_signal() {
        let extractor = BreathingExtractor::new(BreathingExtractorConfig::default()).unwrap();
        assert!(extractor.extract_signal(&AmplitudeFrame::empty()).is_empty());
    }

    #[test]
    fn test_signal_length_matches_sample_count() {
        let extractor = BreathingExtractor::new(BreathingExtractorConfig::default()).unwrap();
        let frame = breathing_frame(0.25, 20.0, 10.0);
        let signal = extractor.extract_signal(&frame);
        assert_eq!(signal.len(), frame.num_samples());
    }

    #[test]
    fn test_extract_signal_is_pure() {
        let extractor = BreathingExtractor::new(BreathingExtractorConfig::default()).unwrap();
        let frame = breathing_frame(0.25, 20.0, 15.0);
        let first = extractor.extract_signal(&frame);
        let second = extractor.extract_signal(&frame);
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_window_skips_filter() {
        let extractor = BreathingExtractor::new(BreathingExtractorConfig::default()).unwrap();
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64; 4]).collect();
        let frame = AmplitudeFrame::from_rows(&rows).unwrap();
        let signal = extractor.extract_signal(&frame);
        // Unfiltered but normalized: zero mean, unit scale
        assert_eq!(signal.len(), 10);
        assert!(mean(&signal).abs() < 1e-12);
    }

    #[test]
    fn test_constant_frame_yields_flat_signal() {
        // Zero variance after subcarrier averaging: mean-center only
        let extractor = BreathingExtractor::new(BreathingExtractorConfig::default()).unwrap();
        let rows: Vec<Vec<f64>> = vec![vec![2.5; 8]; 100];
        let frame = AmplitudeFrame::from_rows(&rows).unwrap();
        let signal = extractor.extract_signal(&frame);
        assert!(signal.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn test_features_on_breathing_frame() {
        let extractor = BreathingExtractor::new(BreathingExtractorConfig::default()).unwrap();
        let frame = breathing_frame(0.25, 20.0, 30.0);
        let features = extractor.extract_features(&frame);

        // 0.25 Hz over 30 s: about 7 breath cycles
        assert!(features.num_peaks >= 6, "got {} peaks", features.num_peaks);
        assert!(features.num_peaks <= 9, "got {} peaks", features.num_peaks);
        assert!(features.variance > 0.05);
        assert!(features.mean_amplitude > 0.0);
        assert_eq!(features.peak_indices.len(), features.num_peaks);
    }

    #[test]
    fn test_find_peaks_simple() {
        let signal = [0.0, 1.0, 0.0, 2.0, 0.0, 1.5, 0.0];
        assert_eq!(find_peaks(&signal, 1), vec![1, 3, 5]);
    }

    #[test]
    fn test_find_peaks_distance_keeps_tallest() {
        let signal = [0.0, 1.0, 0.0, 2.0, 0.0, 1.5, 0.0];
        // Distance 3 removes both neighbors of the tallest peak at 3
        assert_eq!(find_peaks(&signal, 3), vec![3]);
    }

    #[test]
    fn test_find_peaks_plateau_midpoint() {
        let signal = [0.0, 1.0, 1.0, 1.0, 0.0];
        assert_eq!(find_peaks(&signal, 1), vec![2]);
    }

    #[test]
    fn test_find_peaks_short_or_monotonic() {
        assert!(find_peaks(&[], 1).is_empty());
        assert!(find_peaks(&[1.0, 2.0], 1).is_empty());
        assert!(find_peaks(&[1.0, 2.0, 3.0, 4.0], 1).is_empty());
    }
}
