//! Common algorithms and utilities.

mod fft;
mod highpass_filter;
mod note;
mod signal_stats;
mod window_collector;

pub use fft::{complex_fft_in_place, is_supported_fft_size};
pub use highpass_filter::HighPassFilter;
pub use note::{freq_to_midi_note, NoteEstimate};
pub use signal_stats::{signal_stats, SignalStats};
pub use window_collector::WindowCollector;
