use crate::common::{signal_stats, HighPassFilter, NoteEstimate, WindowCollector};
use crate::yin::{
    adaptive_threshold, low_frequency_refine, parabolic_interpolation, resolve_fundamental,
    CandidateSet, ConfigError, DetectorConfig, DifferenceFunction, NoiseTracker, PeriodCandidate,
};

/// Windows whose power relative to the squared ADC full scale is below this are rejected.
pub const POWER_THRESHOLD: f32 = 0.001;
/// Frequencies below this are refined with [low_frequency_refine].
pub const LOW_FREQUENCY_CUTOFF: f32 = 120.0;
/// The lowest frequency reported.
pub const MIN_FREQUENCY: f32 = 75.0;
/// The highest frequency reported.
pub const MAX_FREQUENCY: f32 = 850.0;

/// Why a window did not produce a pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The window length did not match the configured buffer size.
    WrongWindowSize,
    BelowVolumeThreshold,
    /// The power relative to the ADC full scale was below [POWER_THRESHOLD].
    BelowPowerFloor,
    /// No difference function minimum was below the threshold.
    NoCandidates,
    /// The estimated frequency was outside `[MIN_FREQUENCY, MAX_FREQUENCY]`.
    OutOfRange,
}

/// The outcome of analyzing one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchResult {
    /// The detected frequency in Hz, or 0 if no pitch was found.
    pub frequency: f32,
    /// The selected integer period in samples, or 0 if none was selected.
    pub period: usize,
    /// The interpolated period in samples.
    pub precise_period: f32,
    /// The difference function threshold used for candidate selection.
    pub threshold: f32,
    /// The strength of the selected candidate.
    pub strength: f32,
    /// The number of period candidates found.
    pub candidate_count: usize,
    /// Set when `frequency` is 0.
    pub rejection: Option<Rejection>,
}

impl PitchResult {
    pub fn new() -> Self {
        PitchResult {
            frequency: 0.0,
            period: 0,
            precise_period: 0.0,
            threshold: 0.0,
            strength: 0.0,
            candidate_count: 0,
            rejection: None,
        }
    }

    pub fn is_pitch(&self) -> bool {
        self.rejection.is_none() && self.frequency > 0.0
    }

    /// The nearest note of the detected frequency, if any.
    pub fn note(&self) -> Option<NoteEstimate> {
        if self.is_pitch() {
            NoteEstimate::from_frequency(self.frequency)
        } else {
            None
        }
    }
}

impl Default for PitchResult {
    fn default() -> Self {
        PitchResult::new()
    }
}

/// State used to analyze a single window, kept apart from the window collector
/// so that both can be borrowed at once while streaming.
struct Analyzer {
    config: DetectorConfig,
    highpass_filter: HighPassFilter,
    noise_tracker: NoiseTracker,
    difference: DifferenceFunction,
    candidates: CandidateSet,
    result: PitchResult,
}

impl Analyzer {
    fn reject(&mut self, rejection: Rejection) -> f32 {
        self.result.frequency = 0.0;
        self.result.rejection = Some(rejection);
        0.0
    }

    fn analyze(&mut self, window: &mut [u16]) -> f32 {
        self.result = PitchResult::new();

        if window.len() != self.config.buffer_size {
            tracing::trace!(
                "rejected window of length {}, expected {}",
                window.len(),
                self.config.buffer_size
            );
            return self.reject(Rejection::WrongWindowSize);
        }

        let stats = signal_stats(window);
        self.noise_tracker.update(stats.power);

        let volume_threshold = self.config.volume_threshold as f32;
        if stats.power < volume_threshold * volume_threshold {
            tracing::trace!(
                "power {} below volume threshold {}",
                stats.power,
                self.config.volume_threshold
            );
            return self.reject(Rejection::BelowVolumeThreshold);
        }

        let full_scale = self.config.full_scale();
        let normalized_power = stats.power / (full_scale * full_scale);
        if normalized_power < POWER_THRESHOLD {
            tracing::trace!("normalized power {} below floor", normalized_power);
            return self.reject(Rejection::BelowPowerFloor);
        }

        self.highpass_filter.process(window, stats.dc_offset);
        let filtered = signal_stats(window);

        self.difference.compute(window, filtered.dc_offset);
        let threshold = adaptive_threshold(filtered.power, self.noise_tracker.noise_estimate());
        self.result.threshold = threshold;

        self.candidates.select(
            self.difference.curve(),
            self.config.min_period(),
            self.config.max_period(),
            threshold,
        );
        self.result.candidate_count = self.candidates.len();

        let sample_rate = self.config.sample_rate as f32;
        let period = resolve_fundamental(sample_rate, self.candidates.as_slice());
        if period == 0 {
            tracing::trace!("no candidates below threshold {}", threshold);
            return self.reject(Rejection::NoCandidates);
        }
        self.result.period = period;
        self.result.strength = self
            .candidates
            .as_slice()
            .iter()
            .find(|candidate| candidate.period == period)
            .map_or(0.0, |candidate| candidate.strength);

        let precise_period = parabolic_interpolation(self.difference.curve(), period);
        self.result.precise_period = precise_period;

        let mut frequency = sample_rate / precise_period;
        if frequency < LOW_FREQUENCY_CUTOFF {
            frequency = low_frequency_refine(window, filtered.dc_offset, period, sample_rate);
        }
        tracing::trace!(
            "selected period {} ({}) of {} candidates, {} Hz",
            period,
            precise_period,
            self.result.candidate_count,
            frequency
        );

        if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&frequency) {
            return self.reject(Rejection::OutOfRange);
        }

        self.result.frequency = frequency;
        frequency
    }
}

/// A YIN style pitch detector for windows of unsigned ADC samples.
///
/// The detector carries high-pass filter and noise floor state from one
/// window to the next, so consecutive windows should be consecutive
/// parts of the input signal.
pub struct PitchDetector {
    collector: WindowCollector,
    analyzer: Analyzer,
}

impl PitchDetector {
    /// Creates a detector using the default configuration with the given
    /// sample rate and buffer size. Panics if the combination is invalid,
    /// see [from_config](PitchDetector::from_config).
    pub fn new(sample_rate: u32, buffer_size: usize) -> Self {
        let config = DetectorConfig {
            sample_rate,
            buffer_size,
            ..DetectorConfig::default()
        };
        match PitchDetector::from_config(config) {
            Ok(detector) => detector,
            Err(error) => panic!("{}", error),
        }
    }

    pub fn from_config(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(
            "pitch detector: {} Hz, {} samples, periods {}..{}, {:?}",
            config.sample_rate,
            config.buffer_size,
            config.min_period(),
            config.max_period(),
            config.difference_method
        );

        Ok(PitchDetector {
            collector: WindowCollector::new(config.buffer_size),
            analyzer: Analyzer {
                config,
                highpass_filter: HighPassFilter::new(),
                noise_tracker: NoiseTracker::new(),
                difference: DifferenceFunction::new(config.buffer_size, config.difference_method),
                candidates: CandidateSet::new(),
                result: PitchResult::new(),
            },
        })
    }

    /// Analyzes one window of `buffer_size` samples and returns the detected
    /// frequency in Hz, or 0 if no pitch was found. The window is high-pass
    /// filtered in place.
    pub fn detect_pitch_core(&mut self, window: &mut [u16]) -> f32 {
        self.analyzer.analyze(window)
    }

    /// Collects `chunk` into windows of `buffer_size` samples, analyzes each
    /// newly filled window and passes its result to `result_handler`.
    pub fn process<F>(&mut self, chunk: &[u16], mut result_handler: F)
    where
        F: FnMut(&PitchResult),
    {
        let analyzer = &mut self.analyzer;
        self.collector.process(chunk, |window| {
            analyzer.analyze(window);
            result_handler(&analyzer.result);
        });
    }

    /// Sets the RMS level, in ADC units, below which windows are rejected.
    pub fn set_volume_threshold(&mut self, value: u16) {
        self.analyzer.config.volume_threshold = value;
    }

    pub fn volume_threshold(&self) -> u16 {
        self.analyzer.config.volume_threshold
    }

    /// Returns the result of the most recently analyzed window.
    pub fn result(&self) -> &PitchResult {
        &self.analyzer.result
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.analyzer.config
    }

    /// The normalized difference function of the most recently analyzed window.
    /// Not updated for windows rejected before the high-pass filter.
    pub fn difference_curve(&self) -> &[f32] {
        self.analyzer.difference.curve()
    }

    /// The ranked candidates of the most recently analyzed window.
    pub fn candidates(&self) -> &[PeriodCandidate] {
        self.analyzer.candidates.as_slice()
    }

    pub fn noise_tracker(&self) -> &NoiseTracker {
        &self.analyzer.noise_tracker
    }

    /// Clears filter and noise history and any partially collected window.
    /// The configuration, including the volume threshold, is kept.
    pub fn reset(&mut self) {
        self.collector.reset();
        self.analyzer.highpass_filter.reset();
        self.analyzer.noise_tracker.reset();
        self.analyzer.candidates.clear();
        self.analyzer.result = PitchResult::new();
    }
}
