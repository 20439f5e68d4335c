//! # wifi-presence-core
//!
//! Core types, traits, and utilities for the wifi-presence sensing system.
//!
//! This crate provides the foundational building blocks used throughout the
//! wifi-presence workspace:
//!
//! - **Data types**: [`AmplitudeFrame`], [`DetectionVerdict`],
//!   [`BreathingFeatures`], and [`VerdictRecord`] for representing CSI
//!   amplitude windows and detection results.
//! - **Error types**: unified error handling via the [`error`] module.
//! - **Traits**: the [`FrameSource`] seam between CSI acquisition and the
//!   detection pipeline.
//! - **Utilities**: small numeric helpers used by the pipeline.
//!
//! # Example
//!
//! ```rust
//! use wifi_presence_core::AmplitudeFrame;
//!
//! let rows = vec![vec![1.0, 1.1, 0.9], vec![1.2, 1.0, 1.1]];
//! let frame = AmplitudeFrame::from_rows(&rows).unwrap();
//!
//! assert_eq!(frame.num_samples(), 2);
//! assert_eq!(frame.num_subcarriers(), 3);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::{CaptureError, PresenceError, PresenceResult, SignalError, StorageError};
pub use traits::FrameSource;
pub use types::{
    AmplitudeFrame, BreathingFeatures, BreathingSignal, DetectionVerdict, SpectralFeatures,
    VerdictRecord,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default sampling rate assumed for CSI amplitude streams, in Hz.
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 20.0;

/// Default mean-variance threshold above which presence (motion) is declared.
pub const DEFAULT_PRESENCE_THRESHOLD: f64 = 0.15;

/// Default band-limited variance threshold for breathing corroboration.
pub const DEFAULT_BREATHING_THRESHOLD: f64 = 0.05;

/// Low edge of the adult respiration band, in Hz (6 breaths/min).
pub const BREATHING_BAND_LOW_HZ: f64 = 0.1;

/// High edge of the adult respiration band, in Hz (30 breaths/min).
pub const BREATHING_BAND_HIGH_HZ: f64 = 0.5;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CaptureError, PresenceError, PresenceResult, SignalError};
    pub use crate::traits::FrameSource;
    pub use crate::types::{
        AmplitudeFrame, BreathingFeatures, BreathingSignal, DetectionVerdict, SpectralFeatures,
        VerdictRecord,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_valid() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_constants() {
        assert!(DEFAULT_PRESENCE_THRESHOLD > DEFAULT_BREATHING_THRESHOLD);
        assert!(BREATHING_BAND_LOW_HZ < BREATHING_BAND_HIGH_HZ);
        assert!(BREATHING_BAND_HIGH_HZ < DEFAULT_SAMPLE_RATE_HZ / 2.0);
    }
}
