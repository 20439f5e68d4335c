//! Numeric helpers shared across the detection pipeline.

/// Arithmetic mean of a slice; 0.0 for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance of a slice; 0.0 for an empty slice.
#[must_use]
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation of a slice.
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Normalize to zero mean and unit standard deviation.
///
/// A degenerate series (zero standard deviation) is only mean-centered,
/// never divided.
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = std_dev(values);
    if sd > 0.0 {
        values.iter().map(|v| (v - m) / sd).collect()
    } else {
        values.iter().map(|v| v - m).collect()
    }
}
