//! Respiration rate estimation from peak timing.

use wifi_presence_core::types::BreathingSignal;

use crate::breathing::find_peaks;

/// Signals shorter than this cannot support a rate estimate.
const MIN_SIGNAL_SAMPLES: usize = 10;

/// Estimates breaths per minute from inter-peak intervals.
///
/// Deliberately simple: one global average over consecutive inter-peak
/// times, no outlier rejection. A single spurious or missed peak moves
/// the estimate; callers that need robustness should widen the window.
#[derive(Debug, Clone)]
pub struct RateEstimator {
    sample_rate_hz: f64,
    min_peak_distance: usize,
}

impl RateEstimator {
    /// Create an estimator for the given sampling rate.
    ///
    /// The minimum inter-peak distance is fixed at 0.5 s of samples,
    /// bounding the maximum representable rate at 120 BPM.
    #[must_use]
    pub fn new(sample_rate_hz: f64) -> Self {
        Self {
            sample_rate_hz,
            min_peak_distance: ((0.5 * sample_rate_hz) as usize).max(1),
        }
    }

    /// Estimate the breathing rate in BPM.
    ///
    /// Returns 0.0 ("rate undetermined", not an error) when the signal has
    /// fewer than 10 samples or fewer than 2 usable peaks.
    #[must_use]
    pub fn estimate_bpm(&self, signal: &BreathingSignal) -> f64 {
        if signal.len() < MIN_SIGNAL_SAMPLES {
            return 0.0;
        }

        let peaks = find_peaks(signal, self.min_peak_distance);
        if peaks.len() < 2 {
            return 0.0;
        }

        let intervals_secs: Vec<f64> = peaks
            .windows(2)
            .map(|pair| (pair[1] - pair[0]) as f64 / self.sample_rate_hz)
            .collect();
        let mean_interval = intervals_secs.iter().sum::<f64>() / intervals_secs.len() as f64;

        if mean_interval > 0.0 {
            60.0 / mean_interval
        } else {
            0.0
        }
    }
}
