//! # wifi-presence-capture
//!
//! CSI frame acquisition for the wifi-presence system.
//!
//! Provides implementations of the
//! [`FrameSource`](wifi_presence_core::FrameSource) seam:
//!
//! - [`SimulatedFrameSource`]: deterministic seeded generator for
//!   development and tests, with an optional sinusoidal breathing
//!   component. Selected only by explicit configuration.
//!
//! Real NIC/driver capture (nexmon_csi, ESP32 serial, Intel 5300) plugs in
//! behind the same trait; nothing in the pipeline changes when it does.
//!
//! The [`storage`] module persists amplitude frames as NPY files with a
//! bit-exact round trip.

#![forbid(unsafe_code)]

pub mod simulated;
pub mod storage;

pub use simulated::{BreathingComponent, SimulatedFrameSource, SimulatedSourceConfig};
pub use storage::{load_frame, save_frame};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
