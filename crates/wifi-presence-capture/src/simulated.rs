//! Deterministic simulated CSI frame source.
//!
//! A development and test stand-in for real CSI hardware. Frames are
//! generated from a seeded xorshift64 generator, so a given seed always
//! produces the same sequence. An optional sinusoidal breathing component
//! can be mixed in to exercise the respiration path end to end.
//!
//! This source is only ever selected by explicit configuration. It must
//! not be wired in as a fallback when a real capture path fails; masking
//! a capture failure with synthetic data would turn a hardware fault into
//! a plausible-looking "no presence" stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use wifi_presence_core::error::CaptureError;
use wifi_presence_core::traits::FrameSource;
use wifi_presence_core::types::AmplitudeFrame;
use wifi_presence_core::DEFAULT_SAMPLE_RATE_HZ;

/// A sinusoidal component mixed into every subcarrier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BreathingComponent {
    /// Oscillation frequency in Hz.
    pub frequency_hz: f64,
    /// Peak amplitude of the oscillation.
    pub amplitude: f64,
}

/// Configuration for [`SimulatedFrameSource`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedSourceConfig {
    /// Number of subcarriers per sample.
    pub num_subcarriers: usize,
    /// Sampling rate in Hz.
    pub sample_rate_hz: f64,
    /// Seed for the amplitude generator.
    pub seed: u64,
    /// Half-width of the uniform noise around the 1.0 baseline.
    pub noise_amplitude: f64,
    /// Optional breathing oscillation shared across subcarriers.
    pub breathing: Option<BreathingComponent>,
    /// Pace generation at the sampling rate instead of returning
    /// immediately. Matches the timing behavior of a real capture.
    pub realtime: bool,
}

impl Default for SimulatedSourceConfig {
    fn default() -> Self {
        Self {
            num_subcarriers: 30,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            seed: 1,
            noise_amplitude: 0.5,
            breathing: None,
            realtime: false,
        }
    }
}

/// Seeded generator of synthetic amplitude frames.
pub struct SimulatedFrameSource {
    config: SimulatedSourceConfig,
    state: u64,
    sample_clock: u64,
    shutdown: Arc<AtomicBool>,
}

impl SimulatedFrameSource {
    /// Create a source from configuration.
    #[must_use]
    pub fn new(config: SimulatedSourceConfig) -> Self {
        let seed = config.seed.max(1);
        Self {
            config,
            state: seed,
            sample_clock: 0,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach a shared shutdown flag. A capture in progress checks the
    /// flag at each sample boundary and returns the partial frame
    /// accumulated so far when it is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    fn next_uniform(&mut self) -> f64 {
        // xorshift64
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_sample(&mut self) -> Vec<f64> {
        let breath = match self.config.breathing {
            Some(component) => {
                let t = self.sample_clock as f64 / self.config.sample_rate_hz;
                component.amplitude
                    * (2.0 * std::f64::consts::PI * component.frequency_hz * t).sin()
            }
            None => 0.0,
        };
        self.sample_clock += 1;

        (0..self.config.num_subcarriers)
            .map(|_| {
                let noise = (self.next_uniform() - 0.5) * 2.0 * self.config.noise_amplitude;
                1.0 + noise + breath
            })
            .collect()
    }
}

impl FrameSource for SimulatedFrameSource {
    fn capture(&mut self, duration: Duration) -> Result<AmplitudeFrame, CaptureError> {
        let total = (duration.as_secs_f64() * self.config.sample_rate_hz) as usize;
        let sample_period = Duration::from_secs_f64(1.0 / self.config.sample_rate_hz);

        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(total);
        for _ in 0..total {
            if self.shutdown.load(Ordering::Relaxed) {
                debug!(
                    collected = rows.len(),
                    requested = total,
                    "capture interrupted, returning partial frame"
                );
                break;
            }
            rows.push(self.next_sample());
            if self.config.realtime {
                thread::sleep(sample_period);
            }
        }

        AmplitudeFrame::from_rows(&rows).map_err(|e| CaptureError::Io {
            message: e.to_string(),
        })
    }

    fn sample_rate_hz(&self) -> f64 {
        self.config.sample_rate_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_config(seed: u64) -> SimulatedSourceConfig {
        SimulatedSourceConfig {
            seed,
            realtime: false,
            ..SimulatedSourceConfig::default()
        }
    }

    #[test]
    fn test_capture_shape() {
        let mut source = SimulatedFrameSource::new(instant_config(9));
        let frame = source.capture(Duration::from_secs(5)).unwrap();
        assert_eq!(frame.num_samples(), 100); // 5 s at 20 Hz
        assert_eq!(frame.num_subcarriers(), 30);
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = SimulatedFrameSource::new(instant_config(1234));
        let mut b = SimulatedFrameSource::new(instant_config(1234));
        let frame_a = a.capture(Duration::from_secs(2)).unwrap();
        let frame_b = b.capture(Duration::from_secs(2)).unwrap();
        assert_eq!(frame_a, frame_b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = SimulatedFrameSource::new(instant_config(1));
        let mut b = SimulatedFrameSource::new(instant_config(2));
        let frame_a = a.capture(Duration::from_secs(1)).unwrap();
        let frame_b = b.capture(Duration::from_secs(1)).unwrap();
        assert_ne!(frame_a, frame_b);
    }

    #[test]
    fn test_amplitudes_in_expected_band() {
        let mut source = SimulatedFrameSource::new(instant_config(77));
        let frame = source.capture(Duration::from_secs(3)).unwrap();
        for &v in frame.matrix().iter() {
            assert!((0.5..=1.5).contains(&v), "amplitude {v} out of band");
        }
    }

    #[test]
    fn test_preset_shutdown_yields_empty_frame() {
        let shutdown = Arc::new(AtomicBool::new(true));
        let mut source =
            SimulatedFrameSource::new(instant_config(5)).with_shutdown_flag(shutdown);
        let frame = source.capture(Duration::from_secs(5)).unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn test_breathing_component_is_periodic() {
        let mut source = SimulatedFrameSource::new(SimulatedSourceConfig {
            noise_amplitude: 0.0,
            breathing: Some(BreathingComponent {
                frequency_hz: 0.25,
                amplitude: 0.5,
            }),
            ..instant_config(11)
        });
        let frame = source.capture(Duration::from_secs(8)).unwrap();
        let matrix = frame.matrix();
        // With no noise, one full period (80 samples at 20 Hz) repeats
        for t in 0..frame.num_samples() - 80 {
            assert!((matrix[[t, 0]] - matrix[[t + 80, 0]]).abs() < 1e-9);
        }
    }
}
