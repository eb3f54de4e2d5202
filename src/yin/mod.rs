//! A pitch detector based on the YIN algorithm, described in the paper
//! [YIN, a fundamental frequency estimator for speech and music](http://audition.ens.fr/adc/pdf/2002_JASA_YIN.pdf)
//! by Alain de Cheveigné and Hideki Kawahara, tuned for chromatic tuners running on
//! 12-bit microcontroller ADCs.
//!
//! Each window goes through the following steps:
//! * Windows that are too quiet are rejected, see [Rejection].
//! * A [high-pass filter](crate::common::HighPassFilter) removes low frequency drift.
//!   Its state carries over between windows.
//! * The [cumulative mean normalized difference function](DifferenceFunction) is computed,
//!   either directly or using an FFT.
//! * Local minima below an [adaptive threshold](adaptive_threshold), which depends on the
//!   signal to noise ratio estimated by a [NoiseTracker], become [period candidates](CandidateSet).
//! * The fundamental is [picked](resolve_fundamental) among the candidates using even harmonic relations.
//! * The period is [interpolated](parabolic_interpolation) and, for bass notes,
//!   [refined](low_frequency_refine) by correlation.
//!
//! # Examples
//! ## Analyzing windows
//! ```
//! use microtuner::yin::PitchDetector;
//!
//! let sample_rate = 8000;
//! let buffer_size = 1024;
//! let mut detector = PitchDetector::new(sample_rate, buffer_size);
//!
//! // A window of 12-bit samples of a 220 Hz tone, centered around 2048.
//! let mut window: Vec<u16> = (0..buffer_size)
//!     .map(|i| {
//!         let phase = 2.0 * std::f32::consts::PI * 220.0 * (i as f32) / (sample_rate as f32);
//!         (2048.0 + 1000.0 * phase.sin()) as u16
//!     })
//!     .collect();
//!
//! // Note that the window is filtered in place.
//! let frequency = detector.detect_pitch_core(&mut window);
//! assert!((frequency - 220.0).abs() < 2.2);
//! ```
//! ## Streaming
//! Chunks of any size are collected into windows.
//! ```
//! use microtuner::yin::{DetectorConfig, DifferenceMethod, PitchDetector};
//!
//! let config = DetectorConfig {
//!     volume_threshold: 20,
//!     difference_method: DifferenceMethod::Fft,
//!     ..DetectorConfig::default()
//! };
//! let mut detector = PitchDetector::from_config(config).unwrap();
//!
//! let chunk = [2048_u16; 256];
//! detector.process(&chunk, |result| {
//!     if let Some(note) = result.note() {
//!         println!("{} Hz, note {} {:+.1} cents", result.frequency, note.note_number, note.cents);
//!     }
//! });
//! ```

mod candidates;
mod config;
mod detector;
mod difference;
mod harmonics;
mod noise_tracker;
mod refine;
mod threshold;

pub use candidates::{CandidateSet, PeriodCandidate, MAX_CANDIDATE_COUNT, STRENGTH_TIE_TOLERANCE};
pub use config::{ConfigError, DetectorConfig, DifferenceMethod, MAX_SEARCH_FREQUENCY};
pub use detector::{
    PitchDetector, PitchResult, Rejection, LOW_FREQUENCY_CUTOFF, MAX_FREQUENCY, MIN_FREQUENCY,
    POWER_THRESHOLD,
};
pub use difference::DifferenceFunction;
pub use harmonics::{
    is_harmonic, resolve_fundamental, FUNDAMENTAL_CONFIDENCE_THRESHOLD, HARMONIC_TOLERANCE,
};
pub use noise_tracker::{NoiseTracker, HISTORY_SIZE};
pub use refine::{low_frequency_refine, parabolic_interpolation, MIN_REFINE_CORRELATION};
pub use threshold::{
    adaptive_threshold, BASE_THRESHOLD, MAX_THRESHOLD, MIN_THRESHOLD, SNR_THRESHOLD,
};
