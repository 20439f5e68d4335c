//! # wifi-presence-signal
//!
//! The detection pipeline of the wifi-presence system: turns a window of
//! CSI amplitude samples into a presence flag, a breathing flag, and an
//! estimated respiration rate.
//!
//! # Pipeline
//!
//! 1. **Variance classification** ([`PresenceDetector`]): mean
//!    per-subcarrier amplitude variance against a fixed threshold.
//! 2. **Band-limited extraction** ([`BreathingExtractor`]): subcarrier
//!    mean, normalization, and a zero-phase 4th-order Butterworth bandpass
//!    over the 0.1-0.5 Hz respiration band.
//! 3. **Breathing corroboration**: peak count plus in-band variance over
//!    the extracted waveform.
//! 4. **Rate estimation** ([`RateEstimator`]): mean inter-peak interval
//!    converted to breaths per minute.
//! 5. **Periodic monitoring** ([`DetectionMonitor`]): drift-corrected
//!    capture/classify/report cycles over a
//!    [`FrameSource`](wifi_presence_core::FrameSource).
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array2;
//! use wifi_presence_core::AmplitudeFrame;
//! use wifi_presence_signal::PresenceDetector;
//!
//! let detector = PresenceDetector::with_defaults().unwrap();
//! let frame = AmplitudeFrame::new(Array2::from_elem((100, 30), 1.0));
//!
//! let verdict = detector.detect(&frame).unwrap();
//! assert!(!verdict.presence);
//! ```

#![forbid(unsafe_code)]

pub mod breathing;
pub mod detector;
pub mod filter;
pub mod pipeline;
pub mod rate;
pub mod spectral;

pub use breathing::{find_peaks, BreathingExtractor, BreathingExtractorConfig};
pub use detector::{PresenceDetector, PresenceDetectorConfig};
pub use filter::BandpassFilter;
pub use pipeline::{DetectionMonitor, MonitorConfig};
pub use rate::RateEstimator;
pub use spectral::spectral_features;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
