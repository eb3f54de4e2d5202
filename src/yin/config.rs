use core::fmt;

use crate::common::is_supported_fft_size;

/// The highest frequency the candidate search looks for. Determines the shortest
/// candidate period, `sample_rate / MAX_SEARCH_FREQUENCY`.
pub const MAX_SEARCH_FREQUENCY: u32 = 800;

/// How the difference function is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DifferenceMethod {
    /// Time domain summation. O(N²) in the buffer size, works for any even size.
    Direct,
    /// Cross term computed with an FFT of the buffer size, which must be a power of two
    /// between 16 and 4096.
    Fft,
}

/// Pitch detector parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorConfig {
    /// The ADC sample rate in Hz.
    pub sample_rate: u32,
    /// The number of samples per analysis window. Must be even.
    pub buffer_size: usize,
    /// Windows with an RMS level below this value, in ADC units, are rejected.
    pub volume_threshold: u16,
    /// ADC resolution. The power floor is relative to a full scale of `2^adc_bits`.
    pub adc_bits: u8,
    pub difference_method: DifferenceMethod,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            sample_rate: 8000,
            buffer_size: 1024,
            volume_threshold: 0,
            adc_bits: 12,
            difference_method: DifferenceMethod::Direct,
        }
    }
}

impl DetectorConfig {
    /// The shortest period, in samples, considered a pitch candidate.
    pub fn min_period(&self) -> usize {
        (self.sample_rate / MAX_SEARCH_FREQUENCY) as usize
    }

    /// One past the longest period, in samples, considered a pitch candidate.
    /// Also the length of the difference curve.
    pub fn max_period(&self) -> usize {
        self.buffer_size / 2
    }

    /// The largest possible sample value plus one, e.g 4096 for a 12-bit ADC.
    pub fn full_scale(&self) -> f32 {
        (1_u32 << self.adc_bits) as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.buffer_size % 2 != 0 {
            return Err(ConfigError::OddBufferSize(self.buffer_size));
        }
        if self.adc_bits == 0 || self.adc_bits > 16 {
            return Err(ConfigError::UnsupportedAdcBits(self.adc_bits));
        }
        let min_period = self.min_period();
        if min_period < 2 {
            // Interpolation and the harmonic test need at least one lag on each side.
            return Err(ConfigError::SampleRateTooLow(self.sample_rate));
        }
        let max_period = self.max_period();
        if min_period >= max_period {
            return Err(ConfigError::EmptyPeriodRange {
                min_period,
                max_period,
            });
        }
        if self.difference_method == DifferenceMethod::Fft
            && !is_supported_fft_size(self.buffer_size)
        {
            return Err(ConfigError::UnsupportedFftSize(self.buffer_size));
        }
        Ok(())
    }
}

/// Reasons a [DetectorConfig] is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroSampleRate,
    /// The buffer size must be even.
    OddBufferSize(usize),
    /// Only 1 to 16 bit samples fit in `u16`.
    UnsupportedAdcBits(u8),
    /// The sample rate gives a minimum period below 2 samples.
    SampleRateTooLow(u32),
    /// The buffer is too short to contain the minimum period.
    EmptyPeriodRange { min_period: usize, max_period: usize },
    /// The FFT difference method needs a power of two buffer size between 16 and 4096.
    UnsupportedFftSize(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSampleRate => write!(f, "sample rate must be greater than 0"),
            Self::OddBufferSize(size) => write!(f, "buffer size must be even, got {}", size),
            Self::UnsupportedAdcBits(bits) => {
                write!(f, "adc bits must be between 1 and 16, got {}", bits)
            }
            Self::SampleRateTooLow(rate) => write!(
                f,
                "sample rate must be at least {} Hz, got {}",
                2 * MAX_SEARCH_FREQUENCY,
                rate
            ),
            Self::EmptyPeriodRange {
                min_period,
                max_period,
            } => write!(
                f,
                "min period {} must be less than max period {}",
                min_period, max_period
            ),
            Self::UnsupportedFftSize(size) => write!(f, "unsupported fft size {}", size),
        }
    }
}

impl core::error::Error for ConfigError {}
