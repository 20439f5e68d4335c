//! Command-line surface for the wifi-presence system.
//!
//! Three subcommands: `detect` runs the detection loop (continuous or
//! single-shot), `capture` records an amplitude frame to an NPY file, and
//! `analyze` re-runs detection over a previously saved frame.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use wifi_presence_capture::{
    load_frame, save_frame, BreathingComponent, SimulatedFrameSource, SimulatedSourceConfig,
};
use wifi_presence_core::FrameSource;
use wifi_presence_signal::{
    DetectionMonitor, MonitorConfig, PresenceDetector, PresenceDetectorConfig,
};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "wifi-presence", about = "CSI presence and breathing detection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run presence detection (continuous by default)
    Detect(DetectArgs),
    /// Capture an amplitude frame and save it as NPY
    Capture(CaptureArgs),
    /// Re-run detection over a saved amplitude frame
    Analyze(AnalyzeArgs),
    /// Print version information
    Version,
}

/// Shared frame-source selection.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Data source: simulate (deterministic synthetic frames) or hardware
    #[arg(long, default_value = "simulate")]
    pub source: String,

    /// Seed for the simulated source
    #[arg(long, default_value = "1")]
    pub seed: u64,

    /// Mix a sinusoidal breathing component at this frequency (Hz) into
    /// the simulated source
    #[arg(long)]
    pub breathing_hz: Option<f64>,

    /// Sampling rate in Hz
    #[arg(long, default_value = "20.0")]
    pub sample_rate: f64,
}

/// Arguments for `detect`.
#[derive(Args, Debug)]
pub struct DetectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Capture duration per detection cycle, in seconds
    #[arg(long, default_value = "5")]
    pub duration: u64,

    /// Detection interval in seconds
    #[arg(long, default_value = "2")]
    pub interval: u64,

    /// Variance threshold for presence detection
    #[arg(long, default_value = "0.15")]
    pub presence_threshold: f64,

    /// Band-limited variance threshold for breathing detection
    #[arg(long, default_value = "0.05")]
    pub breathing_threshold: f64,

    /// Run a single detection cycle and exit
    #[arg(long)]
    pub test: bool,
}

/// Arguments for `capture`.
#[derive(Args, Debug)]
pub struct CaptureArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Capture duration in seconds
    #[arg(long, default_value = "60")]
    pub duration: u64,

    /// Output NPY file
    #[arg(long)]
    pub output: PathBuf,
}

/// Arguments for `analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// NPY file holding a saved amplitude frame
    #[arg(long)]
    pub input: PathBuf,

    /// Sampling rate the frame was captured at, in Hz
    #[arg(long, default_value = "20.0")]
    pub sample_rate: f64,

    /// Variance threshold for presence detection
    #[arg(long, default_value = "0.15")]
    pub presence_threshold: f64,

    /// Band-limited variance threshold for breathing detection
    #[arg(long, default_value = "0.05")]
    pub breathing_threshold: f64,
}

/// Build the configured frame source.
///
/// Only the simulated source is wired up here; real hardware capture is
/// an explicit error rather than a silent fallback to synthetic data.
fn build_source(args: &SourceArgs, shutdown: Arc<AtomicBool>, realtime: bool) -> Result<SimulatedFrameSource> {
    match args.source.as_str() {
        "simulate" => {
            let config = SimulatedSourceConfig {
                seed: args.seed,
                sample_rate_hz: args.sample_rate,
                breathing: args.breathing_hz.map(|frequency_hz| BreathingComponent {
                    frequency_hz,
                    amplitude: 0.5,
                }),
                realtime,
                ..SimulatedSourceConfig::default()
            };
            warn!("using simulated CSI source (seed {})", args.seed);
            Ok(SimulatedFrameSource::new(config).with_shutdown_flag(shutdown))
        }
        "hardware" => bail!(
            "no hardware CSI backend is built into this binary; \
             wire a FrameSource implementation for your NIC"
        ),
        other => bail!("unknown source '{other}' (expected 'simulate' or 'hardware')"),
    }
}

/// Execute the `detect` subcommand.
pub async fn detect(args: DetectArgs) -> Result<()> {
    let detector = PresenceDetector::new(PresenceDetectorConfig {
        sample_rate_hz: args.source.sample_rate,
        presence_threshold: args.presence_threshold,
        breathing_threshold: args.breathing_threshold,
    })?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let source = build_source(&args.source, Arc::clone(&shutdown), !args.test)?;

    let config = MonitorConfig {
        capture_duration: Duration::from_secs(args.duration),
        interval: Duration::from_secs(args.interval),
    };
    let mut monitor =
        DetectionMonitor::with_shutdown_flag(source, detector, config, Arc::clone(&shutdown));

    if args.test {
        let record = monitor.run_once()?;
        println!("{}", record.status());
        println!("Variance score: {:.4}", record.variance_score);
        return Ok(());
    }

    println!("Starting continuous presence detection (Ctrl+C to stop)");
    let ctrl_c_flag = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            ctrl_c_flag.store(true, Ordering::Relaxed);
        }
    });

    tokio::task::spawn_blocking(move || {
        monitor.run_continuous(|record| {
            println!(
                "[{}] {} | Variance: {:.4}",
                record.timestamp.format("%H:%M:%S"),
                record.status(),
                record.variance_score
            );
        })
    })
    .await
    .context("detection loop panicked")??;

    Ok(())
}

/// Execute the `capture` subcommand.
pub async fn capture(args: CaptureArgs) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let ctrl_c_flag = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("capture interrupted");
            ctrl_c_flag.store(true, Ordering::Relaxed);
        }
    });

    let mut source = build_source(&args.source, shutdown, true)?;
    let duration = Duration::from_secs(args.duration);
    let frame = tokio::task::spawn_blocking(move || source.capture(duration))
        .await
        .context("capture task panicked")??;

    println!(
        "Captured {} samples x {} subcarriers",
        frame.num_samples(),
        frame.num_subcarriers()
    );
    save_frame(&args.output, &frame)?;
    println!("Amplitude frame saved to {}", args.output.display());
    Ok(())
}

/// Execute the `analyze` subcommand.
pub async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let frame = load_frame(&args.input)?;
    println!(
        "Loaded {} samples x {} subcarriers from {}",
        frame.num_samples(),
        frame.num_subcarriers(),
        args.input.display()
    );

    let detector = PresenceDetector::new(PresenceDetectorConfig {
        sample_rate_hz: args.sample_rate,
        presence_threshold: args.presence_threshold,
        breathing_threshold: args.breathing_threshold,
    })?;
    let record = detector.analyze(&frame)?;

    println!("{}", record.status());
    println!("Variance score: {:.4}", record.variance_score);
    if record.breathing_rate_bpm > 0.0 {
        println!("Breathing rate: {:.1} BPM", record.breathing_rate_bpm);
    }
    Ok(())
}
