//! Fixed-capacity ring structures for streaming analysis
//!
//! The normalizer runs two ring structures per sample: a delay line
//! ([`RollingWindow`]) providing bounded look-ahead, and a monotonic deque
//! ([`RollingMax`]) tracking the window maximum in amortized O(1).

mod maximum;
mod window;

pub use maximum::RollingMax;
pub use window::RollingWindow;
