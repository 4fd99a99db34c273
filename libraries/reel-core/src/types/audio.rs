/// Audio-related types
use serde::{Deserialize, Serialize};

use crate::error::{ReelError, Result};

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    pub const DVD_QUALITY: Self = Self(48_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

/// Format of a raw interleaved PCM stream
///
/// Samples are signed integers, interleaved across channels
/// (c0, c1, c0, c1, ... for stereo). 16-bit streams carry an
/// endianness; 8-bit streams ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate
    pub sample_rate: SampleRate,

    /// Number of channels (1 = mono, 2 = stereo, etc.)
    pub channels: u16,

    /// Bits per sample
    pub bits_per_sample: u16,

    /// Byte order of multi-byte samples
    #[serde(default)]
    pub big_endian: bool,
}

impl AudioFormat {
    /// Create a new audio format
    pub fn new(sample_rate: SampleRate, channels: u16, bits_per_sample: u16, big_endian: bool) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
            big_endian,
        }
    }

    /// Create CD quality stereo format (44.1kHz, 16-bit, little-endian)
    pub fn cd_quality() -> Self {
        Self {
            sample_rate: SampleRate::CD_QUALITY,
            channels: 2,
            bits_per_sample: 16,
            big_endian: false,
        }
    }

    /// Calculate the byte rate (bytes per second)
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.as_hz() * u32::from(self.channels) * u32::from(self.bits_per_sample) / 8
    }

    /// Calculate the block alignment (bytes per frame across all channels)
    pub fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    /// Check that the format describes a processable stream
    ///
    /// # Errors
    /// Returns a configuration error for a zero sample rate or zero channels.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate.as_hz() == 0 {
            return Err(ReelError::config("sample rate must be positive"));
        }
        if self.channels == 0 {
            return Err(ReelError::config("channel count must be at least 1"));
        }
        Ok(())
    }
}
