#![allow(non_snake_case)]

use std::sync::{Mutex, MutexGuard, PoisonError};

use microtuner::yin::{DetectorConfig, PitchDetector};

lazy_static! {
    static ref PITCH_DETECTOR: Mutex<PitchDetector> =
        Mutex::new(PitchDetector::new(DEFAULT_SAMPLE_RATE, DEFAULT_BUFFER_SIZE));
}

const DEFAULT_SAMPLE_RATE: u32 = 8000;
const DEFAULT_BUFFER_SIZE: usize = 1024;

fn detector() -> MutexGuard<'static, PitchDetector> {
    // A panic while holding the lock leaves the detector usable.
    PITCH_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Analyzes one window and returns the detected frequency in Hz, or 0.
/// The window is high-pass filtered in place.
///
/// # Safety
/// `buffer` must point to `len` writable samples, or be null.
#[no_mangle]
pub unsafe extern "C" fn PITCHDETECTOR_detect_pitch_core(buffer: *mut u16, len: usize) -> f32 {
    if buffer.is_null() {
        return 0.0;
    }
    let window: &mut [u16] = std::slice::from_raw_parts_mut(buffer, len);
    detector().detect_pitch_core(window)
}

#[no_mangle]
pub extern "C" fn PITCHDETECTOR_set_volume_threshold(value: u16) {
    detector().set_volume_threshold(value);
}

/// Replaces the detector with one for the given sample rate and buffer size,
/// keeping the volume threshold. Returns false, leaving the current detector
/// in place, if the combination is invalid.
#[no_mangle]
pub extern "C" fn PITCHDETECTOR_configure(sample_rate: u32, buffer_size: usize) -> bool {
    let mut detector = detector();
    let config = DetectorConfig {
        sample_rate,
        buffer_size,
        ..*detector.config()
    };
    match PitchDetector::from_config(config) {
        Ok(configured) => {
            *detector = configured;
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_window(sample_rate: u32, buffer_size: usize, freq: f32) -> Vec<u16> {
        (0..buffer_size)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * freq * (i as f32) / (sample_rate as f32);
                (2048.0 + 1000.0 * phase.sin()) as u16
            })
            .collect()
    }

    // The entry points share one detector, so they are exercised in a single test.
    #[test]
    fn test_entry_points() {
        unsafe {
            assert_eq!(PITCHDETECTOR_detect_pitch_core(std::ptr::null_mut(), 1024), 0.0);

            let mut window = sine_window(8000, 1024, 440.0);
            let frequency = PITCHDETECTOR_detect_pitch_core(window.as_mut_ptr(), window.len());
            assert!((frequency - 440.0).abs() < 4.4);

            PITCHDETECTOR_set_volume_threshold(2000);
            let mut window = sine_window(8000, 1024, 440.0);
            assert_eq!(PITCHDETECTOR_detect_pitch_core(window.as_mut_ptr(), window.len()), 0.0);

            assert!(!PITCHDETECTOR_configure(8000, 1023));
            assert!(PITCHDETECTOR_configure(16000, 2048));
            assert_eq!(detector().volume_threshold(), 2000);
            assert_eq!(detector().config().buffer_size, 2048);

            PITCHDETECTOR_set_volume_threshold(0);
            let mut window = sine_window(16000, 2048, 196.0);
            let frequency = PITCHDETECTOR_detect_pitch_core(window.as_mut_ptr(), window.len());
            assert!((frequency - 196.0).abs() < 1.96);
        }
    }
}
