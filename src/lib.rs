//! A `no_std` pitch detector for chromatic tuners, built around a YIN style
//! [cumulative mean normalized difference function](yin/index.html).
//! The detector analyzes one window of unsigned ADC samples at a time and
//! reports the fundamental frequency in Hz, or `0.0` if no pitch was found.
//! It is meant for monophonic input, like a single instrument string, and
//! cannot detect multiple pitches at once.
//!
//! Features
//! * No allocations after construction, suitable for real time use on microcontrollers.
//! * Noise aware, adaptive detection threshold.
//! * Even harmonic disambiguation between period candidates.
//! * Sub-sample period refinement, with a dedicated path for bass notes.
//!
//! See the [yin](yin/index.html) module for examples.

#![no_std]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod common;
pub mod yin;

pub use yin::{DetectorConfig, PitchDetector, PitchResult};
