/// Rolling maximum (monotonic deque)
///
/// Tracks the maximum value in a rolling window of fixed size. An internal
/// ring buffer holds candidate maxima in non-increasing order between two
/// indices; each value is stored and evicted at most once, so an
/// `add`/`remove` pair costs amortized O(1) where a naive scan would cost
/// O(window).
use crate::error::{AudioError, Result};

/// Online maximum over a rolling window
///
/// Callers must pace the structure themselves: `add` whenever a value
/// enters the observed window and `remove` whenever one leaves it. The
/// tie convention is fixed: `add` evicts strictly smaller entries only,
/// so every copy of an equal value is stored, and `remove` drops the
/// front entry only when the removed value equals the current maximum.
#[derive(Debug, Clone)]
pub struct RollingMax<T> {
    /// Candidate maxima in non-increasing order from `maximum` to `minimum`
    buffer: Vec<T>,
    /// Index of the last appended (lowest) candidate
    minimum: usize,
    /// Index of the current maximum
    maximum: usize,
}

impl<T: Copy + Default + PartialOrd> RollingMax<T> {
    /// Create a rolling maximum for the given window size
    ///
    /// # Panics
    /// Panics if `window_size` is zero; callers validate sizes at
    /// construction time.
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "window size must be positive");
        Self {
            buffer: vec![T::default(); window_size],
            minimum: 0,
            maximum: 0,
        }
    }

    /// The maximum of the values in the current window
    pub fn get(&self) -> T {
        self.buffer[self.maximum]
    }

    /// The window size this structure was created for
    pub fn window_size(&self) -> usize {
        self.buffer.len()
    }

    /// Record a value entering the window
    ///
    /// # Errors
    /// Returns `WindowOverflow` when more values were added than removed,
    /// i.e. the caller failed to keep `remove` paced with `add`.
    pub fn add(&mut self, value: T) -> Result<()> {
        if value > self.buffer[self.minimum] {
            // The new value dominates the back of the deque: walk towards
            // the front, evicting every strictly smaller candidate.
            while self.minimum != self.maximum {
                let previous = if self.minimum == 0 {
                    self.buffer.len() - 1
                } else {
                    self.minimum - 1
                };
                if value <= self.buffer[previous] {
                    break;
                }
                self.minimum = previous;
            }
        } else {
            self.minimum = (self.minimum + 1) % self.buffer.len();
            if self.minimum == self.maximum {
                return Err(AudioError::WindowOverflow);
            }
        }

        self.buffer[self.minimum] = value;
        Ok(())
    }

    /// Record a value leaving the window
    ///
    /// Only affects the result when the removed value was the current
    /// maximum; everything smaller was already dominated and never kept.
    pub fn remove(&mut self, value: T) {
        if value == self.get() && self.maximum != self.minimum {
            self.maximum = (self.maximum + 1) % self.buffer.len();
        }
    }
}
