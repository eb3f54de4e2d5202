use alloc::{boxed::Box, vec};

/// Collects chunks of arbitrary size into consecutive, non-overlapping windows.
///
/// Windows do not overlap because the pitch detector filters each window in place
/// and carries filter state from one window to the next.
pub struct WindowCollector {
    window: Box<[u16]>,
    write_index: usize,
    filled_window_count: usize,
}

impl WindowCollector {
    pub fn new(window_size: usize) -> Self {
        if window_size == 0 {
            panic!("Window size must be greater than 0")
        }
        WindowCollector {
            window: vec![0; window_size].into_boxed_slice(),
            write_index: 0,
            filled_window_count: 0,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window.len()
    }

    /// The number of samples collected towards the next window.
    pub fn pending_sample_count(&self) -> usize {
        self.write_index
    }

    /// The number of windows filled since creation or the last reset.
    pub fn filled_window_count(&self) -> usize {
        self.filled_window_count
    }

    /// Discards any partially collected window.
    pub fn reset(&mut self) {
        self.write_index = 0;
        self.filled_window_count = 0;
    }

    /// Appends `samples` and invokes `handler` with each newly filled window.
    /// The handler may modify the window; it is overwritten by subsequent samples.
    pub fn process<F>(&mut self, samples: &[u16], mut handler: F)
    where
        F: FnMut(&mut [u16]),
    {
        let mut remaining = samples;
        while !remaining.is_empty() {
            let free = self.window.len() - self.write_index;
            let count = free.min(remaining.len());
            self.window[self.write_index..self.write_index + count]
                .copy_from_slice(&remaining[..count]);
            self.write_index += count;
            remaining = &remaining[count..];

            if self.write_index == self.window.len() {
                self.write_index = 0;
                self.filled_window_count += 1;
                handler(&mut self.window);
            }
        }
    }
}
