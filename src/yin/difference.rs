use alloc::{boxed::Box, vec};
use microfft::Complex32;

use crate::common::{complex_fft_in_place, is_supported_fft_size};
use crate::yin::DifferenceMethod;

/// The cumulative mean normalized difference function (CMND) of a window,
/// evaluated at lags `0..buffer_size / 2`. Minima close to zero correspond to
/// lags at which the window is close to periodic.
pub struct DifferenceFunction {
    method: DifferenceMethod,
    curve: Box<[f32]>,
    // FFT buffers, empty unless method is DifferenceMethod::Fft.
    fft_window: Box<[Complex32]>,
    fft_head: Box<[Complex32]>,
}

impl DifferenceFunction {
    pub fn new(buffer_size: usize, method: DifferenceMethod) -> Self {
        if buffer_size < 2 {
            panic!("Buffer size must be at least 2")
        }
        let fft_size = match method {
            DifferenceMethod::Direct => 0,
            DifferenceMethod::Fft => {
                if !is_supported_fft_size(buffer_size) {
                    panic!("Unsupported fft size {}", buffer_size)
                }
                buffer_size
            }
        };
        let mut curve = vec![0.0; buffer_size / 2].into_boxed_slice();
        curve[0] = 1.0;
        DifferenceFunction {
            method,
            curve,
            fft_window: vec![Complex32::new(0.0, 0.0); fft_size].into_boxed_slice(),
            fft_head: vec![Complex32::new(0.0, 0.0); fft_size].into_boxed_slice(),
        }
    }

    pub fn method(&self) -> DifferenceMethod {
        self.method
    }

    /// The normalized curve from the most recent call to [compute](DifferenceFunction::compute).
    /// `curve()[0]` is always 1.
    pub fn curve(&self) -> &[f32] {
        &self.curve
    }

    /// Computes the normalized difference function of `samples`, whose length must be
    /// twice the curve length.
    pub fn compute(&mut self, samples: &[u16], dc_offset: f32) {
        if samples.len() != 2 * self.curve.len() {
            panic!(
                "Got window of length {}, expected {}",
                samples.len(),
                2 * self.curve.len()
            )
        }
        match self.method {
            DifferenceMethod::Direct => difference_direct(samples, dc_offset, &mut self.curve),
            DifferenceMethod::Fft => difference_fft(
                samples,
                dc_offset,
                &mut self.fft_window,
                &mut self.fft_head,
                &mut self.curve,
            ),
        }
        cumulative_mean_normalize(&mut self.curve);
    }
}

/// d(tau) = sum over j < N/2 of (x[j] - x[j + tau])^2.
fn difference_direct(samples: &[u16], dc_offset: f32, result: &mut [f32]) {
    let lag_count = result.len();
    for (tau, value) in result.iter_mut().enumerate() {
        let mut sum: f32 = 0.0;
        for (a, b) in samples[..lag_count]
            .iter()
            .zip(samples[tau..tau + lag_count].iter())
        {
            let delta = (*a as f32 - dc_offset) - (*b as f32 - dc_offset);
            sum += delta * delta;
        }
        *value = sum;
    }
}

/// Computes the same d(tau) as [difference_direct], expanded as
/// `e(0) + e(tau) - 2 c(tau)`, where `e(tau)` is the energy of `x[tau..tau + N/2]`
/// and `c(tau)` the cross correlation of the first half of the window with the whole window.
/// Lags never exceed N/2, so a circular correlation of length N has no wrap around.
fn difference_fft(
    samples: &[u16],
    dc_offset: f32,
    window: &mut [Complex32],
    head: &mut [Complex32],
    result: &mut [f32],
) {
    let lag_count = result.len();
    let fft_size = window.len();

    for (i, sample) in samples.iter().enumerate() {
        let x = *sample as f32 - dc_offset;
        window[i] = Complex32::new(x, 0.0);
        head[i] = Complex32::new(if i < lag_count { x } else { 0.0 }, 0.0);
    }

    complex_fft_in_place(window);
    complex_fft_in_place(head);

    // The inverse FFT of conj(H) * W is obtained as the conjugate of the forward
    // FFT of its conjugate, H * conj(W). Only the real part is needed.
    for (w, h) in window.iter_mut().zip(head.iter()) {
        *w = *h * w.conj();
    }
    complex_fft_in_place(window);
    let scale = 1.0 / (fft_size as f32);

    let energy_at_0: f32 = samples[..lag_count]
        .iter()
        .map(|s| {
            let x = *s as f32 - dc_offset;
            x * x
        })
        .sum();
    let mut energy = energy_at_0;
    for (tau, value) in result.iter_mut().enumerate() {
        if tau > 0 {
            let leaving = samples[tau - 1] as f32 - dc_offset;
            let entering = samples[tau + lag_count - 1] as f32 - dc_offset;
            energy += entering * entering - leaving * leaving;
        }
        let cross = scale * window[tau].re;
        let difference = energy_at_0 + energy - 2.0 * cross;
        // Rounding can push values at exact periods slightly below zero.
        *value = if difference > 0.0 { difference } else { 0.0 };
    }
}

/// Normalizes a difference function in place by the cumulative mean of its values
/// at lags 1 to tau. The value at lag 0 is defined as 1, as are values where the
/// cumulative sum is zero, which only happens for perfectly flat input.
fn cumulative_mean_normalize(difference: &mut [f32]) {
    difference[0] = 1.0;
    let mut running_sum: f32 = 0.0;
    for tau in 1..difference.len() {
        running_sum += difference[tau];
        difference[tau] = if running_sum > 0.0 {
            difference[tau] * (tau as f32) / running_sum
        } else {
            1.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::signal_stats;
    use rand_core::RngCore;
    use rand_pcg::Pcg64;
    use std::vec::Vec;

    // Naive reference, straight from the definition.
    fn cmnd_reference(samples: &[u16]) -> Vec<f32> {
        let lag_count = samples.len() / 2;
        let mut d: Vec<f64> = vec![0.0; lag_count];
        for tau in 0..lag_count {
            for j in 0..lag_count {
                let delta = samples[j] as f64 - samples[j + tau] as f64;
                d[tau] += delta * delta;
            }
        }
        let mut result = vec![1.0_f32; lag_count];
        let mut sum = 0.0;
        for tau in 1..lag_count {
            sum += d[tau];
            result[tau] = (d[tau] * tau as f64 / sum) as f32;
        }
        result
    }

    fn noisy_sine(len: usize, period: f32, seed: &str) -> Vec<u16> {
        let mut rng: Pcg64 = rand_seeder::Seeder::from(seed).make_rng();
        (0..len)
            .map(|i| {
                let phase = 2.0 * core::f32::consts::PI * (i as f32) / period;
                let noise = (rng.next_u32() % 64) as f32 - 32.0;
                (2048.0 + 900.0 * phase.sin() + noise) as u16
            })
            .collect()
    }

    #[test]
    fn test_direct_matches_reference() {
        let samples = noisy_sine(128, 13.7, "direct");
        let stats = signal_stats(&samples);
        let mut difference = DifferenceFunction::new(samples.len(), DifferenceMethod::Direct);
        difference.compute(&samples, stats.dc_offset);

        let reference = cmnd_reference(&samples);
        for (value, expected) in difference.curve().iter().zip(reference.iter()) {
            assert!((value - expected).abs() < 1e-3, "{} != {}", value, expected);
        }
    }

    #[test]
    fn test_fft_matches_direct() {
        for (size, period) in [(256, 21.3_f32), (1024, 36.4), (1024, 97.0)].iter() {
            let samples = noisy_sine(*size, *period, "fft");
            let stats = signal_stats(&samples);

            let mut direct = DifferenceFunction::new(*size, DifferenceMethod::Direct);
            direct.compute(&samples, stats.dc_offset);
            let mut fft = DifferenceFunction::new(*size, DifferenceMethod::Fft);
            fft.compute(&samples, stats.dc_offset);

            assert_eq!(fft.curve()[0], 1.0);
            for (tau, (a, b)) in direct.curve().iter().zip(fft.curve().iter()).enumerate() {
                assert!((a - b).abs() < 1e-3, "lag {}: direct {} fft {}", tau, a, b);
            }
        }
    }

    #[test]
    fn test_dip_at_period() {
        // Exactly periodic with period 8
        let pattern = [2000_u16, 2300, 2500, 2300, 2000, 1700, 1500, 1700];
        let samples: Vec<u16> = pattern.iter().cycle().take(64).cloned().collect();
        let stats = signal_stats(&samples);
        let mut difference = DifferenceFunction::new(samples.len(), DifferenceMethod::Direct);
        difference.compute(&samples, stats.dc_offset);
        let curve = difference.curve();
        assert_eq!(curve[0], 1.0);
        assert_eq!(curve[8], 0.0);
        assert_eq!(curve[16], 0.0);
        assert!(curve[4] > 1.0);
    }

    #[test]
    fn test_flat_window() {
        let samples = [2048_u16; 64];
        for method in [DifferenceMethod::Direct, DifferenceMethod::Fft].iter() {
            let mut difference = DifferenceFunction::new(samples.len(), *method);
            difference.compute(&samples, 2048.0);
            assert!(difference.curve().iter().all(|value| *value == 1.0));
        }
    }

    #[test]
    #[should_panic]
    fn test_wrong_window_length() {
        let mut difference = DifferenceFunction::new(64, DifferenceMethod::Direct);
        difference.compute(&[0; 32], 0.0);
    }
}
