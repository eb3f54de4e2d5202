/// The number of recent window powers the noise floor is estimated from.
pub const HISTORY_SIZE: usize = 8;

/// Tracks the power of recent windows and estimates the background noise
/// level as the minimum power in that history.
pub struct NoiseTracker {
    history: [f32; HISTORY_SIZE],
    write_index: usize,
    is_filled: bool,
    noise_estimate: f32,
}

impl NoiseTracker {
    pub fn new() -> Self {
        NoiseTracker {
            history: [0.0; HISTORY_SIZE],
            write_index: 0,
            is_filled: false,
            noise_estimate: 0.0,
        }
    }

    /// Records the power of a window, overwriting the oldest entry, and returns
    /// the updated noise estimate, or `None` until the history has been filled once.
    pub fn update(&mut self, power: f32) -> Option<f32> {
        self.history[self.write_index] = power;
        self.write_index = (self.write_index + 1) % HISTORY_SIZE;

        if !self.is_filled && self.write_index == 0 {
            // The write index wrapped around for the first time.
            self.is_filled = true;
        }

        if self.is_filled {
            let mut min_power = self.history[0];
            for power in self.history.iter().skip(1) {
                if *power < min_power {
                    min_power = *power;
                }
            }
            self.noise_estimate = min_power;
        }

        self.noise_estimate()
    }

    /// The current noise estimate, or `None` before the history has been filled.
    pub fn noise_estimate(&self) -> Option<f32> {
        if self.is_filled {
            Some(self.noise_estimate)
        } else {
            None
        }
    }

    pub fn is_warmed_up(&self) -> bool {
        self.is_filled
    }

    pub fn reset(&mut self) {
        *self = NoiseTracker::new();
    }
}

impl Default for NoiseTracker {
    fn default() -> Self {
        NoiseTracker::new()
    }
}
