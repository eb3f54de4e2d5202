/// Threshold used until a noise estimate is available.
pub const BASE_THRESHOLD: f32 = 0.15;
/// Threshold for clean, high SNR input.
pub const MIN_THRESHOLD: f32 = 0.10;
/// Threshold for noisy input.
pub const MAX_THRESHOLD: f32 = 0.25;
/// Signal to noise power ratio below which input is considered noisy.
/// Input is considered clean above twice this ratio.
pub const SNR_THRESHOLD: f32 = 3.0;

/// Maps the signal to noise ratio of a window to the difference function threshold
/// below which minima are considered pitch candidates. Clean signals get a lower,
/// more sensitive threshold and noisy signals a higher, more conservative one.
///
/// `noise_estimate` is `None` until the noise tracker has warmed up, in which case
/// [BASE_THRESHOLD] is returned.
pub fn adaptive_threshold(power: f32, noise_estimate: Option<f32>) -> f32 {
    let noise = match noise_estimate {
        Some(noise) if noise > 0.0 => noise,
        _ => return BASE_THRESHOLD,
    };

    let snr = power / noise;
    if snr > 2.0 * SNR_THRESHOLD {
        MIN_THRESHOLD
    } else if snr < SNR_THRESHOLD {
        MAX_THRESHOLD
    } else {
        let ratio = (snr - SNR_THRESHOLD) / SNR_THRESHOLD;
        MAX_THRESHOLD - ratio * (MAX_THRESHOLD - MIN_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_warmed_up() {
        assert_eq!(adaptive_threshold(1000.0, None), BASE_THRESHOLD);
        assert_eq!(adaptive_threshold(1000.0, Some(0.0)), BASE_THRESHOLD);
    }

    #[test]
    fn test_snr_ranges() {
        assert_eq!(adaptive_threshold(700.0, Some(100.0)), MIN_THRESHOLD);
        assert_eq!(adaptive_threshold(200.0, Some(100.0)), MAX_THRESHOLD);
        assert!((adaptive_threshold(450.0, Some(100.0)) - 0.175).abs() < 1e-6);
        // The interpolation meets both ends.
        assert!((adaptive_threshold(300.0, Some(100.0)) - MAX_THRESHOLD).abs() < 1e-6);
        assert!((adaptive_threshold(600.0, Some(100.0)) - MIN_THRESHOLD).abs() < 1e-6);
    }

    #[test]
    fn test_monotonic_in_snr() {
        let mut prev = adaptive_threshold(0.0, Some(1.0));
        for i in 1..100 {
            let threshold = adaptive_threshold(0.1 * i as f32, Some(1.0));
            assert!(threshold <= prev + 1e-6);
            assert!(threshold >= MIN_THRESHOLD - 1e-6 && threshold <= MAX_THRESHOLD + 1e-6);
            prev = threshold;
        }
    }
}
