//! DC offset cancellation
//!
//! A constant bias in the input wastes headroom and produces a click at
//! stream boundaries. Each channel's bias is estimated with a single-pole
//! low-pass filter whose coefficient is 1/sample_rate, giving a time
//! constant of roughly one second regardless of channel count.

/// Per-channel DC offset estimator and canceller
#[derive(Debug, Clone)]
pub struct DcCanceller {
    /// Estimated offset per source channel
    offsets: Vec<f64>,
    /// Per-sample adaptation rate, 1/sample_rate
    factor: f64,
    enabled: bool,
}

impl DcCanceller {
    /// Create a canceller for the given channel count and sample rate
    pub fn new(channels: usize, sample_rate: u32) -> Self {
        Self {
            offsets: vec![0.0; channels],
            factor: 1.0 / f64::from(sample_rate),
            enabled: true,
        }
    }

    /// Whether offsets are currently being estimated and subtracted
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable cancellation at runtime
    ///
    /// While disabled the estimates are frozen, not reset.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The current offset estimate for a channel
    pub fn offset(&self, channel: usize) -> f64 {
        self.offsets[channel]
    }

    /// Update the estimate for `channel` and return the adjusted sample
    ///
    /// When disabled, the sample passes through unchanged.
    pub fn apply(&mut self, channel: usize, sample: i32) -> i32 {
        if !self.enabled {
            return sample;
        }
        let offset = self.offsets[channel] * (1.0 - self.factor) + f64::from(sample) * self.factor;
        self.offsets[channel] = offset;
        sample - offset.round() as i32
    }
}
