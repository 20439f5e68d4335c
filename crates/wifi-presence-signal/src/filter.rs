//! Butterworth bandpass filtering with zero-phase application.
//!
//! The filter is designed the classical way: analog Butterworth lowpass
//! prototype, lowpass-to-bandpass transformation, then bilinear transform
//! with frequency pre-warping. Cutoffs are specified in Hz and normalized
//! internally by the Nyquist frequency.
//!
//! Zero-phase filtering runs the filter forward and then backward over the
//! signal (with odd-reflection edge padding and steady-state initial
//! conditions), so peak timing in the output is not shifted relative to
//! the input. Downstream rate estimation depends on that property.

use std::f64::consts::PI;

use num_complex::Complex64;

use wifi_presence_core::error::SignalError;

/// A digital bandpass filter in transfer-function form.
///
/// For an order-`n` bandpass design the numerator and denominator each
/// carry `2n + 1` coefficients, with `a[0] == 1`.
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    b: Vec<f64>,
    a: Vec<f64>,
}

impl BandpassFilter {
    /// Design a Butterworth bandpass filter.
    ///
    /// - `order`: order of the lowpass prototype (the bandpass transfer
    ///   function ends up with `2 * order` poles).
    /// - `low_hz` / `high_hz`: band edges in Hz.
    /// - `sample_rate_hz`: sampling rate in Hz.
    ///
    /// Band edges must satisfy `0 < low < high < sample_rate / 2`.
    pub fn butterworth(
        order: usize,
        low_hz: f64,
        high_hz: f64,
        sample_rate_hz: f64,
    ) -> Result<Self, SignalError> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(SignalError::InvalidSamplingRate {
                value: sample_rate_hz,
            });
        }
        let nyquist = sample_rate_hz / 2.0;
        if order == 0 || !(low_hz > 0.0 && low_hz < high_hz && high_hz < nyquist) {
            return Err(SignalError::Filter {
                message: format!(
                    "invalid bandpass design: order={order}, band=[{low_hz}, {high_hz}] Hz, nyquist={nyquist} Hz"
                ),
            });
        }

        // Normalize by Nyquist, then pre-warp onto the analog axis.
        // The internal design rate of 2.0 follows the usual convention for
        // Nyquist-normalized cutoffs.
        let fs = 2.0;
        let warp = |wn: f64| 2.0 * fs * (PI * wn / fs).tan();
        let warped_low = warp(low_hz / nyquist);
        let warped_high = warp(high_hz / nyquist);
        let bw = warped_high - warped_low;
        let wo = (warped_low * warped_high).sqrt();

        // Analog Butterworth lowpass prototype: `order` poles on the unit
        // circle in the left half-plane, no zeros, unit gain.
        let prototype_poles: Vec<Complex64> = (1..=order)
            .map(|k| {
                let theta = PI * (2 * k + order - 1) as f64 / (2 * order) as f64;
                Complex64::from_polar(1.0, theta)
            })
            .collect();

        // Lowpass-to-bandpass: each prototype pole splits into a pair, and
        // `order` zeros appear at the origin.
        let half_bw = Complex64::new(bw / 2.0, 0.0);
        let wo_sq = Complex64::new(wo * wo, 0.0);
        let mut analog_poles = Vec::with_capacity(2 * order);
        for &p in &prototype_poles {
            let scaled = p * half_bw;
            let offset = (scaled * scaled - wo_sq).sqrt();
            analog_poles.push(scaled + offset);
            analog_poles.push(scaled - offset);
        }
        let analog_zeros = vec![Complex64::new(0.0, 0.0); order];
        let analog_gain = bw.powi(order as i32);

        // Bilinear transform s -> (2/T)(z-1)/(z+1).
        let fs2 = Complex64::new(2.0 * fs, 0.0);
        let digital_poles: Vec<Complex64> =
            analog_poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();
        let mut digital_zeros: Vec<Complex64> =
            analog_zeros.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
        // Zeros at analog infinity land at z = -1.
        digital_zeros.resize(2 * order, Complex64::new(-1.0, 0.0));

        let num: Complex64 = analog_zeros.iter().map(|&z| fs2 - z).product();
        let den: Complex64 = analog_poles.iter().map(|&p| fs2 - p).product();
        let digital_gain = analog_gain * (num / den).re;

        let b: Vec<f64> = poly(&digital_zeros)
            .iter()
            .map(|c| c.re * digital_gain)
            .collect();
        let a: Vec<f64> = poly(&digital_poles).iter().map(|c| c.re).collect();

        if !b.iter().chain(a.iter()).all(|c| c.is_finite()) {
            return Err(SignalError::Filter {
                message: "filter design produced non-finite coefficients".to_string(),
            });
        }

        Ok(Self { b, a })
    }

    /// Numerator coefficients.
    #[must_use]
    pub fn numerator(&self) -> &[f64] {
        &self.b
    }

    /// Denominator coefficients (`a[0] == 1`).
    #[must_use]
    pub fn denominator(&self) -> &[f64] {
        &self.a
    }

    /// Single forward pass (direct form II transposed) from the given
    /// initial state. Returns the output sequence.
    fn forward(&self, x: &[f64], zi: &[f64]) -> Vec<f64> {
        let n = self.b.len();
        let mut z = zi.to_vec();
        let mut y = Vec::with_capacity(x.len());
        for &xi in x {
            let yi = self.b[0] * xi + z[0];
            for j in 0..n - 2 {
                z[j] = self.b[j + 1] * xi + z[j + 1] - self.a[j + 1] * yi;
            }
            z[n - 2] = self.b[n - 1] * xi - self.a[n - 1] * yi;
            y.push(yi);
        }
        y
    }

    /// Steady-state initial filter state for a unit step input.
    ///
    /// Scaling this state by the first input sample makes the filter start
    /// in equilibrium, which keeps edge transients small enough for the
    /// reflection padding in [`apply_zero_phase`](Self::apply_zero_phase)
    /// to absorb them.
    fn step_initial_state(&self) -> Vec<f64> {
        let n = self.b.len() - 1;
        // Solve (I - A^T) zi = B where A is the companion matrix of `a`
        // and B = b[1:] - a[1:] * b[0].
        let mut m = vec![vec![0.0; n]; n];
        for (i, row) in m.iter_mut().enumerate() {
            row[0] += self.a[i + 1];
            row[i] += 1.0;
            if i + 1 < n {
                row[i + 1] -= 1.0;
            }
        }
        let rhs: Vec<f64> = (0..n)
            .map(|i| self.b[i + 1] - self.a[i + 1] * self.b[0])
            .collect();
        solve_linear(m, rhs)
    }

    /// Apply the filter forward and backward for zero net phase shift.
    ///
    /// The input is extended at both ends by odd reflection before
    /// filtering and the extensions are stripped afterwards, so the output
    /// has exactly the input's length. Inputs of fewer than two samples
    /// are returned unchanged.
    #[must_use]
    pub fn apply_zero_phase(&self, x: &[f64]) -> Vec<f64> {
        if x.len() < 2 {
            return x.to_vec();
        }
        let pad = (3 * (self.b.len() - 1)).min(x.len() - 1);
        let n = x.len();

        // Odd reflection about the first and last samples.
        let mut ext = Vec::with_capacity(n + 2 * pad);
        for i in (1..=pad).rev() {
            ext.push(2.0 * x[0] - x[i]);
        }
        ext.extend_from_slice(x);
        for i in 1..=pad {
            ext.push(2.0 * x[n - 1] - x[n - 1 - i]);
        }

        let zi = self.step_initial_state();
        let scale = |state: &[f64], v: f64| -> Vec<f64> { state.iter().map(|s| s * v).collect() };

        let forward = self.forward(&ext, &scale(&zi, ext[0]));
        let mut reversed: Vec<f64> = forward.into_iter().rev().collect();
        let backward = self.forward(&reversed, &scale(&zi, reversed[0]));
        reversed = backward.into_iter().rev().collect();

        reversed[pad..pad + n].to_vec()
    }
}

/// Expand a polynomial from its roots. Returns coefficients from the
/// highest power down, with a leading coefficient of one.
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &r in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * r;
        }
        coeffs = next;
    }
    coeffs
}

/// Gaussian elimination with partial pivoting.
///
/// The systems solved here are small (2n x 2n for an order-n design) and
/// well conditioned for stable filters.
fn solve_linear(mut m: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Vec<f64> {
    let n = rhs.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))
            .unwrap_or(col);
        m.swap(col, pivot);
        rhs.swap(col, pivot);
        let diag = m[col][col];
        if diag == 0.0 {
            continue;
        }
        for row in col + 1..n {
            let factor = m[row][col] / diag;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                m[row][k] -= factor * m[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = rhs[row];
        for k in row + 1..n {
            acc -= m[row][k] * x[k];
        }
        x[row] = if m[row][row] != 0.0 {
            acc / m[row][row]
        } else {
            0.0
        };
    }
    x
}
