//! Presence and breathing classification over amplitude frames.
//!
//! Two distinct decision paths, never conflated:
//!
//! - **Presence (motion)**: mean of per-subcarrier amplitude variances
//!   across the window, compared against `presence_threshold`. Motion
//!   stirs the multipath environment and raises variance on most
//!   subcarriers at once.
//! - **Breathing**: peak count and variance of the band-limited
//!   respiration waveform, compared against `breathing_threshold`. This
//!   operates on a different signal (the single filtered series) than the
//!   raw multi-subcarrier variance test.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use wifi_presence_core::error::SignalError;
use wifi_presence_core::types::{
    AmplitudeFrame, BreathingFeatures, BreathingSignal, DetectionVerdict, VerdictRecord,
};
use wifi_presence_core::utils::variance;
use wifi_presence_core::{
    DEFAULT_BREATHING_THRESHOLD, DEFAULT_PRESENCE_THRESHOLD, DEFAULT_SAMPLE_RATE_HZ,
};

use crate::breathing::{BreathingExtractor, BreathingExtractorConfig};
use crate::rate::RateEstimator;

/// Configuration for [`PresenceDetector`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceDetectorConfig {
    /// Sampling rate of incoming frames, in Hz.
    pub sample_rate_hz: f64,
    /// Mean-variance threshold above which presence (motion) is declared.
    pub presence_threshold: f64,
    /// Band-limited variance threshold for breathing corroboration.
    pub breathing_threshold: f64,
}

impl Default for PresenceDetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            presence_threshold: DEFAULT_PRESENCE_THRESHOLD,
            breathing_threshold: DEFAULT_BREATHING_THRESHOLD,
        }
    }
}

/// Classifies amplitude frames into presence/breathing verdicts.
///
/// Thresholds and sampling rate are fixed at construction; detection is a
/// pure function of the frame and this immutable state.
#[derive(Debug, Clone)]
pub struct PresenceDetector {
    config: PresenceDetectorConfig,
    extractor: BreathingExtractor,
    rate_estimator: RateEstimator,
}

impl PresenceDetector {
    /// Create a detector, validating thresholds and designing the
    /// respiration-band filter up front.
    pub fn new(config: PresenceDetectorConfig) -> Result<Self, SignalError> {
        if !(config.presence_threshold.is_finite() && config.presence_threshold >= 0.0)
            || !(config.breathing_threshold.is_finite() && config.breathing_threshold >= 0.0)
        {
            return Err(SignalError::Filter {
                message: format!(
                    "thresholds must be finite and non-negative: presence={}, breathing={}",
                    config.presence_threshold, config.breathing_threshold
                ),
            });
        }
        let extractor = BreathingExtractor::new(BreathingExtractorConfig {
            sample_rate_hz: config.sample_rate_hz,
            ..BreathingExtractorConfig::default()
        })?;
        let rate_estimator = RateEstimator::new(config.sample_rate_hz);
        Ok(Self {
            config,
            extractor,
            rate_estimator,
        })
    }

    /// Create a detector with default thresholds at 20 Hz.
    pub fn with_defaults() -> Result<Self, SignalError> {
        Self::new(PresenceDetectorConfig::default())
    }

    /// The configuration this detector was built with.
    #[must_use]
    pub fn config(&self) -> &PresenceDetectorConfig {
        &self.config
    }

    /// Classify a frame.
    ///
    /// An empty frame short-circuits to the neutral verdict before any
    /// filtering or normalization runs. Non-finite amplitudes are an
    /// error: the feature-extraction path fails loud rather than folding
    /// garbage into a plausible-looking verdict.
    pub fn detect(&self, frame: &AmplitudeFrame) -> Result<DetectionVerdict, SignalError> {
        if frame.is_empty() {
            return Ok(DetectionVerdict::neutral());
        }
        self.validate_finite(frame)?;

        let variance_score = self.variance_score(frame);
        let presence = variance_score > self.config.presence_threshold;

        let features = self.extractor.extract_features(frame);
        let breathing =
            features.num_peaks > 0 && features.variance > self.config.breathing_threshold;

        debug!(
            variance_score,
            band_variance = features.variance,
            num_peaks = features.num_peaks,
            presence,
            breathing,
            "frame classified"
        );

        Ok(DetectionVerdict {
            presence,
            breathing,
            variance_score,
        })
    }

    /// Classify a frame and, when presence or breathing is signaled,
    /// estimate the breathing rate. Produces the record one detection
    /// cycle reports.
    pub fn analyze(&self, frame: &AmplitudeFrame) -> Result<VerdictRecord, SignalError> {
        let verdict = self.detect(frame)?;

        let breathing_rate_bpm = if verdict.presence || verdict.breathing {
            let signal = self.extractor.extract_signal(frame);
            self.rate_estimator.estimate_bpm(&signal)
        } else {
            0.0
        };

        Ok(VerdictRecord {
            timestamp: Utc::now(),
            presence: verdict.presence,
            breathing: verdict.breathing,
            variance_score: verdict.variance_score,
            breathing_rate_bpm,
        })
    }

    /// Band-limited respiration waveform for a frame.
    #[must_use]
    pub fn extract_breathing_signal(&self, frame: &AmplitudeFrame) -> BreathingSignal {
        self.extractor.extract_signal(frame)
    }

    /// Breathing features for a frame.
    #[must_use]
    pub fn extract_breathing_features(&self, frame: &AmplitudeFrame) -> BreathingFeatures {
        self.extractor.extract_features(frame)
    }

    /// Breathing rate in BPM for an already-extracted signal; 0.0 when
    /// undetermined.
    #[must_use]
    pub fn estimate_breathing_rate(&self, signal: &BreathingSignal) -> f64 {
        self.rate_estimator.estimate_bpm(signal)
    }

    /// Mean of per-subcarrier amplitude variances across the window.
    fn variance_score(&self, frame: &AmplitudeFrame) -> f64 {
        let matrix = frame.matrix();
        if matrix.ncols() == 0 {
            return 0.0;
        }
        let per_subcarrier: Vec<f64> = matrix
            .columns()
            .into_iter()
            .map(|col| variance(&col.to_vec()))
            .collect();
        per_subcarrier.iter().sum::<f64>() / per_subcarrier.len() as f64
    }

    fn validate_finite(&self, frame: &AmplitudeFrame) -> Result<(), SignalError> {
        let matrix = frame.matrix();
        for ((sample, subcarrier), &value) in matrix.indexed_iter() {
            if !value.is_finite() {
                return Err(SignalError::NonFiniteAmplitude { sample, subcarrier });
            }
        }
        Ok(())
    }
}
