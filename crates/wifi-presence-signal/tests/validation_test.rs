//! Validation tests for the detection pipeline against known inputs.
//!
//! These tests exercise the documented end-to-end properties: neutral
//! verdicts for empty windows, presence on high-variance synthetic motion,
//! breathing detection and rate accuracy on a synthetic respiration
//! waveform, and threshold monotonicity.

use ndarray::Array2;
use std::f64::consts::PI;

use wifi_presence_core::AmplitudeFrame;
use wifi_presence_signal::{
    spectral_features, PresenceDetector, PresenceDetectorConfig, RateEstimator,
};

/// Deterministic uniform values in [0, range) from a fixed seed (xorshift64).
fn pseudo_uniform(seed: u64, count: usize, range: f64) -> Vec<f64> {
    let mut state = seed.max(1);
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64 * range
        })
        .collect()
}

/// 200 samples x 30 subcarriers of uniform [0, 5) amplitudes: the
/// high-variance synthetic "motion" case.
fn motion_frame() -> AmplitudeFrame {
    let values = pseudo_uniform(0xC51, 200 * 30, 5.0);
    AmplitudeFrame::new(Array2::from_shape_vec((200, 30), values).unwrap())
}

/// A 0.25 Hz sinusoid (amplitude 0.5) replicated across 30 subcarriers
/// with small additive noise, 20 Hz for 30 seconds.
fn breathing_frame() -> AmplitudeFrame {
    let fs = 20.0;
    let n = 600;
    let subcarriers = 30;
    let noise = pseudo_uniform(0xB4EA7, n * subcarriers, 0.02);
    let mut data = Array2::zeros((n, subcarriers));
    for t in 0..n {
        let breath = 0.5 * (2.0 * PI * 0.25 * t as f64 / fs).sin();
        for s in 0..subcarriers {
            data[[t, s]] = 1.0 + breath + noise[t * subcarriers + s];
        }
    }
    AmplitudeFrame::new(data)
}

#[test]
fn validate_empty_frame_neutral_verdict() {
    let detector = PresenceDetector::with_defaults().unwrap();
    let verdict = detector.detect(&AmplitudeFrame::empty()).unwrap();
    assert!(!verdict.presence);
    assert!(!verdict.breathing);
    assert_eq!(verdict.variance_score, 0.0);
}

#[test]
fn validate_motion_case() {
    let detector = PresenceDetector::with_defaults().unwrap();
    let verdict = detector.detect(&motion_frame()).unwrap();

    println!("motion variance score: {:.4}", verdict.variance_score);
    assert!(
        verdict.variance_score > 0.15,
        "variance score too low: {}",
        verdict.variance_score
    );
    assert!(verdict.presence);
}

#[test]
fn validate_breathing_case() {
    let detector = PresenceDetector::with_defaults().unwrap();
    let frame = breathing_frame();
    let record = detector.analyze(&frame).unwrap();

    println!(
        "breathing case: variance={:.4}, bpm={:.2}",
        record.variance_score, record.breathing_rate_bpm
    );
    assert!(!record.presence, "variance {}", record.variance_score);
    assert!(record.breathing);
    // 0.25 Hz x 60 = 15 BPM expected
    assert!(
        (12.0..=18.0).contains(&record.breathing_rate_bpm),
        "BPM out of range: {}",
        record.breathing_rate_bpm
    );
}

#[test]
fn validate_extractor_idempotence() {
    let detector = PresenceDetector::with_defaults().unwrap();
    let frame = breathing_frame();
    let first = detector.extract_breathing_signal(&frame);
    let second = detector.extract_breathing_signal(&frame);
    assert_eq!(first, second);
    assert_eq!(first.len(), frame.num_samples());
}

#[test]
fn validate_short_signal_rate_floor() {
    let estimator = RateEstimator::new(20.0);
    for n in 0..10 {
        let signal: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();
        assert_eq!(estimator.estimate_bpm(&signal), 0.0, "length {n}");
    }
}

#[test]
fn validate_presence_threshold_monotonicity() {
    let frame = motion_frame();
    let mut last_presence = true;
    for threshold in [0.0, 0.1, 1.0, 2.0, 5.0, 50.0] {
        let detector = PresenceDetector::new(PresenceDetectorConfig {
            presence_threshold: threshold,
            ..PresenceDetectorConfig::default()
        })
        .unwrap();
        let presence = detector.detect(&frame).unwrap().presence;
        assert!(
            last_presence || !presence,
            "presence flipped false -> true at threshold {threshold}"
        );
        last_presence = presence;
    }
}

#[test]
fn validate_spectral_features_agree_with_rate() {
    let detector = PresenceDetector::with_defaults().unwrap();
    let frame = breathing_frame();
    let signal = detector.extract_breathing_signal(&frame);

    let spectral = spectral_features(&signal, 20.0);
    println!(
        "dominant frequency: {:.3} Hz, band power fraction: {:.3}",
        spectral.dominant_frequency_hz,
        spectral.breathing_band_power / spectral.total_power
    );
    assert!((spectral.dominant_frequency_hz - 0.25).abs() < 0.05);
    // Band-limited signal: the positive-half respiration band carries most
    // of the spectrum (the total includes the mirrored negative half)
    assert!(spectral.breathing_band_power > 0.35 * spectral.total_power);
}
