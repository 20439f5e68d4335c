//! Error types for the wifi-presence system.
//!
//! Error handling uses [`thiserror`] for automatic `Display` and `Error`
//! trait implementations.
//!
//! # Error Hierarchy
//!
//! - [`PresenceError`]: Top-level error type that encompasses all subsystem errors
//! - [`SignalError`]: Errors from the detection pipeline
//! - [`CaptureError`]: Errors from CSI frame acquisition
//! - [`StorageError`]: Errors from frame persistence
//!
//! Expected per-cycle numeric edge cases (empty window, short window,
//! zero-variance signal) are *not* errors: components resolve them locally
//! to defined neutral values. These types cover the unexpected failures
//! that must reach the caller.

use thiserror::Error;

/// A specialized `Result` type for presence-detection operations.
pub type PresenceResult<T> = Result<T, PresenceError>;

/// Top-level error type for the wifi-presence system.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PresenceError {
    /// Detection pipeline error
    #[error("Signal processing error: {0}")]
    Signal(#[from] SignalError),

    /// Frame acquisition error
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Frame persistence error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
    },
}

impl PresenceError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is recoverable (the next detection
    /// cycle may succeed without operator intervention).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Signal(e) => e.is_recoverable(),
            Self::Capture(e) => e.is_recoverable(),
            Self::Storage(_) | Self::Configuration { .. } => false,
        }
    }
}

/// Errors from the detection pipeline.
///
/// The defined edge cases of the pipeline (empty frame, fewer samples than
/// the filter needs, zero-variance input) never surface as `SignalError`;
/// they produce neutral verdicts. These variants cover malformed input and
/// unexpected numerical failures, which are propagated rather than masked.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SignalError {
    /// Rows of an amplitude matrix disagree on subcarrier count
    #[error("Ragged amplitude frame: row {row} has {actual} subcarriers, expected {expected}")]
    RaggedFrame {
        /// Offending row index
        row: usize,
        /// Subcarrier count of the first row
        expected: usize,
        /// Subcarrier count of the offending row
        actual: usize,
    },

    /// Amplitude data contains non-finite values
    #[error("Non-finite amplitude at sample {sample}, subcarrier {subcarrier}")]
    NonFiniteAmplitude {
        /// Sample (row) index
        sample: usize,
        /// Subcarrier (column) index
        subcarrier: usize,
    },

    /// Filter design or application error
    #[error("Filter error: {message}")]
    Filter {
        /// Description of the filter error
        message: String,
    },

    /// Sampling rate is not usable for frequency-domain work
    #[error("Invalid sampling rate: {value} Hz")]
    InvalidSamplingRate {
        /// The invalid rate
        value: f64,
    },
}

impl SignalError {
    /// Returns `true` if this error is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::NonFiniteAmplitude { .. } => true,
            Self::RaggedFrame { .. } | Self::Filter { .. } | Self::InvalidSamplingRate { .. } => {
                false
            }
        }
    }
}

/// Errors from CSI frame acquisition.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CaptureError {
    /// The capture interface could not be opened
    #[error("Capture interface '{interface}' unavailable: {reason}")]
    InterfaceUnavailable {
        /// Interface identifier
        interface: String,
        /// Reason it could not be opened
        reason: String,
    },

    /// The source stopped delivering frames mid-capture
    #[error("Capture stream ended after {received} of {expected} samples")]
    StreamEnded {
        /// Samples delivered before the stream ended
        received: usize,
        /// Samples the capture window called for
        expected: usize,
    },

    /// I/O failure while reading from the capture interface
    #[error("Capture I/O error: {message}")]
    Io {
        /// Description of the I/O failure
        message: String,
    },
}

impl CaptureError {
    /// Returns `true` if this error is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::StreamEnded { .. } | Self::Io { .. } => true,
            Self::InterfaceUnavailable { .. } => false,
        }
    }
}

/// Errors from frame persistence.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StorageError {
    /// Writing a frame to disk failed
    #[error("Failed to write '{path}': {message}")]
    WriteFailed {
        /// Destination path
        path: String,
        /// Underlying failure
        message: String,
    },

    /// Reading a frame from disk failed
    #[error("Failed to read '{path}': {message}")]
    ReadFailed {
        /// Source path
        path: String,
        /// Underlying failure
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_error_display() {
        let err = PresenceError::configuration("interval must be positive");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn test_signal_error_recoverable() {
        let recoverable = SignalError::NonFiniteAmplitude {
            sample: 3,
            subcarrier: 7,
        };
        assert!(recoverable.is_recoverable());

        let non_recoverable = SignalError::RaggedFrame {
            row: 1,
            expected: 30,
            actual: 29,
        };
        assert!(!non_recoverable.is_recoverable());
    }

    #[test]
    fn test_error_conversion() {
        let capture_err = CaptureError::InterfaceUnavailable {
            interface: "wlan0".into(),
            reason: "no CSI firmware".into(),
        };
        let top: PresenceError = capture_err.into();
        assert!(matches!(top, PresenceError::Capture(_)));
        assert!(!top.is_recoverable());
    }

    #[test]
    fn test_stream_ended_message() {
        let err = CaptureError::StreamEnded {
            received: 40,
            expected: 100,
        };
        assert!(err.to_string().contains("40 of 100"));
        assert!(err.is_recoverable());
    }
}
