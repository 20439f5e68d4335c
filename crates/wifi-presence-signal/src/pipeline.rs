//! Periodic detection loop.
//!
//! The monitor is synchronous and strictly sequential: capture, classify,
//! report, sleep, repeat. Cadence is drift-corrected (sleep for
//! `interval - elapsed`, floored at zero) so cycle start times track the
//! configured interval even as processing time varies. A shared shutdown
//! flag ends the loop cleanly after the current cycle; an interrupted
//! capture never produces a partial verdict.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use wifi_presence_core::error::PresenceResult;
use wifi_presence_core::traits::FrameSource;
use wifi_presence_core::types::VerdictRecord;

use crate::detector::PresenceDetector;

/// Configuration for [`DetectionMonitor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Capture window per detection cycle.
    pub capture_duration: Duration,
    /// Target spacing between cycle starts.
    pub interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            capture_duration: Duration::from_secs(5),
            interval: Duration::from_secs(2),
        }
    }
}

/// Runs detection cycles against a [`FrameSource`].
pub struct DetectionMonitor<S: FrameSource> {
    source: S,
    detector: PresenceDetector,
    config: MonitorConfig,
    shutdown: Arc<AtomicBool>,
}

impl<S: FrameSource> DetectionMonitor<S> {
    /// Create a monitor over the given source and detector.
    pub fn new(source: S, detector: PresenceDetector, config: MonitorConfig) -> Self {
        Self::with_shutdown_flag(source, detector, config, Arc::new(AtomicBool::new(false)))
    }

    /// Create a monitor sharing an externally owned shutdown flag, so the
    /// same flag can also interrupt the frame source mid-capture.
    pub fn with_shutdown_flag(
        source: S,
        detector: PresenceDetector,
        config: MonitorConfig,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            detector,
            config,
            shutdown,
        }
    }

    /// Handle for requesting shutdown from another thread (for example a
    /// Ctrl-C handler). Setting the flag ends the continuous loop after
    /// the cycle in flight.
    #[must_use]
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run exactly one detection cycle and return its record.
    ///
    /// Capture failures propagate; they are fatal to the cycle and this
    /// monitor never substitutes synthetic data for a failed capture.
    pub fn run_once(&mut self) -> PresenceResult<VerdictRecord> {
        let frame = self.source.capture(self.config.capture_duration)?;
        debug!(
            samples = frame.num_samples(),
            subcarriers = frame.num_subcarriers(),
            "captured frame"
        );
        let record = self.detector.analyze(&frame)?;
        info!(variance_score = record.variance_score, "{}", record.status());
        Ok(record)
    }

    /// Run detection cycles until the shutdown flag is set, delivering
    /// each record to `sink`.
    ///
    /// Each cycle sleeps for `max(0, interval - elapsed)` before the next,
    /// keeping cadence close to the configured interval. If a capture is
    /// interrupted by shutdown, its (possibly partial) frame is discarded
    /// without a verdict.
    pub fn run_continuous(
        &mut self,
        mut sink: impl FnMut(&VerdictRecord),
    ) -> PresenceResult<()> {
        info!(
            capture_secs = self.config.capture_duration.as_secs_f64(),
            interval_secs = self.config.interval.as_secs_f64(),
            "starting continuous presence detection"
        );

        while !self.shutdown.load(Ordering::Relaxed) {
            let started = Instant::now();

            let frame = self.source.capture(self.config.capture_duration)?;
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            let record = self.detector.analyze(&frame)?;
            info!(variance_score = record.variance_score, "{}", record.status());
            sink(&record);

            if let Some(remaining) = self.config.interval.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }

        info!("presence detection stopped");
        Ok(())
    }
}
