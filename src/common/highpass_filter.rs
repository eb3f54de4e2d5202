/// The default coefficient, giving a cutoff of roughly `0.008 * sample_rate`.
pub const DEFAULT_ALPHA: f32 = 0.95;

/// A single pole [high-pass filter](https://en.wikipedia.org/wiki/High-pass_filter#Discrete-time_realization)
/// operating in place on unsigned ADC samples.
///
/// The filter state is kept between calls to [process](HighPassFilter::process),
/// so consecutive windows are filtered as one continuous signal.
pub struct HighPassFilter {
    alpha: f32,
    /// Most recent DC removed input value.
    prev_input: f32,
    /// Most recent output value, before the DC offset is added back.
    prev_output: f32,
}

impl HighPassFilter {
    pub fn new() -> Self {
        HighPassFilter::from_options(DEFAULT_ALPHA)
    }

    pub fn from_options(alpha: f32) -> Self {
        HighPassFilter {
            alpha,
            prev_input: 0.0,
            prev_output: 0.0,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Filters `samples` in place. `dc_offset` is removed before filtering
    /// and added back to the output, which is then truncated to `u16`.
    pub fn process(&mut self, samples: &mut [u16], dc_offset: f32) {
        for sample in samples.iter_mut() {
            let input = *sample as f32 - dc_offset;
            let output = self.alpha * (self.prev_output + input - self.prev_input);
            // Float to int casts saturate, so out of range values clip to 0 or u16::MAX.
            *sample = (output + dc_offset) as u16;
            self.prev_input = input;
            self.prev_output = output;
        }
    }

    /// Returns (prev_input, prev_output).
    pub fn state(&self) -> (f32, f32) {
        (self.prev_input, self.prev_output)
    }

    pub fn reset(&mut self) {
        self.prev_input = 0.0;
        self.prev_output = 0.0;
    }
}

impl Default for HighPassFilter {
    fn default() -> Self {
        HighPassFilter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_response() {
        let mut filter = HighPassFilter::new();
        let mut window = [1100_u16; 8];
        filter.process(&mut window, 1000.0);

        // The first sample sees a step from 0 to 100, which then decays by alpha per sample.
        assert_eq!(window[0], 1095);
        assert_eq!(window[1], 1090);
        assert_eq!(window[2], 1085);
        assert!(window[7] < window[6]);
        let (prev_input, prev_output) = filter.state();
        assert_eq!(prev_input, 100.0);
        assert!((prev_output - 100.0 * 0.95_f32.powi(8)).abs() < 1e-3);
    }

    #[test]
    fn test_state_carries_over() {
        let mut input = [0_u16; 64];
        for (i, sample) in input.iter_mut().enumerate() {
            *sample = 2048 + ((i * 37) % 200) as u16;
        }

        let mut whole = input;
        let mut filter = HighPassFilter::new();
        filter.process(&mut whole, 2100.0);

        let mut split = input;
        let mut split_filter = HighPassFilter::new();
        let (first, second) = split.split_at_mut(20);
        split_filter.process(first, 2100.0);
        split_filter.process(second, 2100.0);

        assert_eq!(whole, split);
        assert_eq!(filter.state(), split_filter.state());
    }

    #[test]
    fn test_reset() {
        let mut filter = HighPassFilter::new();
        let mut window = [3000_u16; 16];
        filter.process(&mut window, 2000.0);
        assert!(filter.state() != (0.0, 0.0));
        filter.reset();
        assert_eq!(filter.state(), (0.0, 0.0));
    }

    #[test]
    fn test_output_saturates() {
        // The drop from 4000 to 0 overshoots below zero, which clips instead of wrapping.
        let mut filter = HighPassFilter::new();
        let mut window = [4000_u16, 0];
        filter.process(&mut window, 1000.0);
        assert_eq!(window, [3850, 0]);
    }
}
