//! Domain types for presence and breathing detection.

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// A window of CSI amplitude measurements.
///
/// Rows are time-ordered samples, columns are subcarriers in a fixed
/// order. The frame is immutable once handed to the detection pipeline;
/// every accessor borrows.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeFrame {
    data: Array2<f64>,
}

impl AmplitudeFrame {
    /// Create a frame from an existing matrix.
    #[must_use]
    pub fn new(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// Create an empty frame (zero samples, zero subcarriers).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            data: Array2::zeros((0, 0)),
        }
    }

    /// Build a frame from per-sample amplitude rows, validating that every
    /// row carries the same subcarrier count.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SignalError> {
        if rows.is_empty() {
            return Ok(Self::empty());
        }
        let n_subcarriers = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_subcarriers {
                return Err(SignalError::RaggedFrame {
                    row: i,
                    expected: n_subcarriers,
                    actual: row.len(),
                });
            }
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), n_subcarriers), flat)
            .map_err(|e| SignalError::Filter {
                message: e.to_string(),
            })?;
        Ok(Self { data })
    }

    /// Number of time samples (rows).
    #[must_use]
    pub fn num_samples(&self) -> usize {
        self.data.nrows()
    }

    /// Number of subcarriers (columns).
    #[must_use]
    pub fn num_subcarriers(&self) -> usize {
        self.data.ncols()
    }

    /// `true` if the frame holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Borrow the underlying samples x subcarriers matrix.
    #[must_use]
    pub fn matrix(&self) -> &Array2<f64> {
        &self.data
    }

    /// Consume the frame, returning the underlying matrix.
    #[must_use]
    pub fn into_matrix(self) -> Array2<f64> {
        self.data
    }
}

/// One-dimensional band-limited respiration waveform.
///
/// Zero-mean and unit-scale (unless the source series was degenerate),
/// one value per input sample index.
pub type BreathingSignal = Vec<f64>;

/// Outcome of one classification pass over a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionVerdict {
    /// Motion/presence detected (raw cross-subcarrier variance test).
    pub presence: bool,
    /// Breathing corroborated (band-limited peak + variance test).
    pub breathing: bool,
    /// Mean per-subcarrier amplitude variance over the window.
    pub variance_score: f64,
}

impl DetectionVerdict {
    /// The neutral verdict returned for an empty frame.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            presence: false,
            breathing: false,
            variance_score: 0.0,
        }
    }
}

/// Features derived from the band-limited respiration waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingFeatures {
    /// Variance of the band-limited signal.
    pub variance: f64,
    /// Mean absolute amplitude of the band-limited signal.
    pub mean_amplitude: f64,
    /// Number of local maxima found.
    pub num_peaks: usize,
    /// The band-limited signal itself.
    pub breathing_signal: BreathingSignal,
    /// Sample indices of the local maxima, ascending.
    pub peak_indices: Vec<usize>,
}

/// Spectral summary of a one-dimensional signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralFeatures {
    /// Frequency bin with the largest magnitude (DC excluded), in Hz.
    pub dominant_frequency_hz: f64,
    /// Summed magnitude inside the 0.1-0.5 Hz respiration band.
    pub breathing_band_power: f64,
    /// Summed magnitude over the whole spectrum.
    pub total_power: f64,
}

/// The record one detection cycle reports to its sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictRecord {
    /// Wall-clock time the cycle completed.
    pub timestamp: DateTime<Utc>,
    /// Motion/presence flag.
    pub presence: bool,
    /// Breathing flag.
    pub breathing: bool,
    /// Mean per-subcarrier variance over the window.
    pub variance_score: f64,
    /// Estimated respiration rate in BPM; 0.0 when undetermined.
    pub breathing_rate_bpm: f64,
}

impl VerdictRecord {
    /// Human-readable status line for console sinks.
    #[must_use]
    pub fn status(&self) -> String {
        if self.presence {
            "Presence detected (motion)".to_string()
        } else if self.breathing {
            format!("Breathing detected ({:.1} BPM)", self.breathing_rate_bpm)
        } else {
            "No presence".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_from_rows() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let frame = AmplitudeFrame::from_rows(&rows).unwrap();
        assert_eq!(frame.num_samples(), 2);
        assert_eq!(frame.num_subcarriers(), 3);
        assert_eq!(frame.matrix()[[1, 2]], 6.0);
    }

    #[test]
    fn test_frame_from_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = AmplitudeFrame::from_rows(&rows).unwrap_err();
        assert!(matches!(
            err,
            SignalError::RaggedFrame {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_empty_frame() {
        let frame = AmplitudeFrame::empty();
        assert!(frame.is_empty());
        assert_eq!(frame.num_samples(), 0);

        let from_rows = AmplitudeFrame::from_rows(&[]).unwrap();
        assert!(from_rows.is_empty());
    }

    #[test]
    fn test_neutral_verdict() {
        let v = DetectionVerdict::neutral();
        assert!(!v.presence);
        assert!(!v.breathing);
        assert_eq!(v.variance_score, 0.0);
    }

    #[test]
    fn test_record_status() {
        let mut record = VerdictRecord {
            timestamp: Utc::now(),
            presence: false,
            breathing: true,
            variance_score: 0.08,
            breathing_rate_bpm: 15.2,
        };
        assert!(record.status().contains("15.2 BPM"));

        record.presence = true;
        assert!(record.status().contains("motion"));

        record.presence = false;
        record.breathing = false;
        assert_eq!(record.status(), "No presence");
    }
}
