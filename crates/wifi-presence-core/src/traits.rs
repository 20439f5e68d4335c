//! Core trait definitions for the wifi-presence system.
//!
//! [`FrameSource`] is the seam between CSI acquisition and the detection
//! pipeline: the pipeline only ever sees an [`AmplitudeFrame`], never the
//! NIC, driver, or simulator behind it. Production wires a hardware-backed
//! source here; tests wire a deterministic simulated one. A simulated
//! source must only ever be selected by explicit configuration, never
//! substituted when a real capture fails.

use std::time::Duration;

use crate::error::CaptureError;
use crate::types::AmplitudeFrame;

/// A producer of time-ordered CSI amplitude windows.
pub trait FrameSource {
    /// Capture amplitude samples for approximately `duration` at the
    /// source's configured sampling rate.
    ///
    /// A source that is interrupted early (operator shutdown) returns the
    /// partial frame accumulated so far, which may be empty; that is not
    /// an error. Failures to deliver any data at all (interface missing,
    /// I/O fault) are errors.
    fn capture(&mut self, duration: Duration) -> Result<AmplitudeFrame, CaptureError>;

    /// Sampling rate of the frames this source produces, in Hz.
    fn sample_rate_hz(&self) -> f64;
}
