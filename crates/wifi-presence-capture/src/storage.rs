//! Amplitude-frame persistence in the NPY array format.
//!
//! One frame per file, stored as a two-dimensional `f64` matrix. NPY
//! preserves IEEE-754 doubles exactly, so a save-then-load round trip
//! reproduces the matrix bit for bit.

use std::path::Path;

use ndarray::Array2;
use ndarray_npy::{read_npy, write_npy};
use tracing::info;

use wifi_presence_core::error::StorageError;
use wifi_presence_core::types::AmplitudeFrame;

/// Write a frame to `path` as an NPY file.
pub fn save_frame(path: impl AsRef<Path>, frame: &AmplitudeFrame) -> Result<(), StorageError> {
    let path = path.as_ref();
    write_npy(path, frame.matrix()).map_err(|e| StorageError::WriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    info!(
        path = %path.display(),
        samples = frame.num_samples(),
        subcarriers = frame.num_subcarriers(),
        "amplitude frame saved"
    );
    Ok(())
}

/// Read a frame previously written with [`save_frame`].
pub fn load_frame(path: impl AsRef<Path>) -> Result<AmplitudeFrame, StorageError> {
    let path = path.as_ref();
    let matrix: Array2<f64> = read_npy(path).map_err(|e| StorageError::ReadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    info!(
        path = %path.display(),
        samples = matrix.nrows(),
        subcarriers = matrix.ncols(),
        "amplitude frame loaded"
    );
    Ok(AmplitudeFrame::new(matrix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.npy");

        // Values chosen to have non-trivial binary representations
        let rows: Vec<Vec<f64>> = (0..40)
            .map(|t| {
                (0..30)
                    .map(|s| (t as f64 * 0.1 + s as f64 * 0.01).sin() * std::f64::consts::E)
                    .collect()
            })
            .collect();
        let frame = AmplitudeFrame::from_rows(&rows).unwrap();

        save_frame(&path, &frame).unwrap();
        let loaded = load_frame(&path).unwrap();

        assert_eq!(frame.num_samples(), loaded.num_samples());
        assert_eq!(frame.num_subcarriers(), loaded.num_subcarriers());
        for (original, restored) in frame.matrix().iter().zip(loaded.matrix().iter()) {
            assert_eq!(
                original.to_bits(),
                restored.to_bits(),
                "round trip not bit-exact"
            );
        }
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_frame("/nonexistent/frame.npy").unwrap_err();
        assert!(matches!(err, StorageError::ReadFailed { .. }));
    }

    #[test]
    fn test_save_to_bad_path_fails() {
        let frame = AmplitudeFrame::from_rows(&[vec![1.0, 2.0]]).unwrap();
        let err = save_frame("/nonexistent/dir/frame.npy", &frame).unwrap_err();
        assert!(matches!(err, StorageError::WriteFailed { .. }));
    }
}
