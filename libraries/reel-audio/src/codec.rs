//! Sample format codec
//!
//! Decodes a raw PCM byte stream into signed integer samples and encodes
//! samples back into bytes. Three formats are supported: signed 8-bit, and
//! signed 16-bit in either byte order. The decoder is a byte-at-a-time
//! state machine so partial samples may span `write` calls.

use reel_core::AudioFormat;

use crate::error::{AudioError, Result};

/// Supported PCM sample formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Signed 8-bit PCM
    Pcm8,
    /// Signed 16-bit PCM, little-endian
    Pcm16Le,
    /// Signed 16-bit PCM, big-endian
    Pcm16Be,
}

impl SampleFormat {
    /// Select the sample format for an audio format
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` for bit depths other than 8 and 16.
    pub fn from_audio_format(format: &AudioFormat) -> Result<Self> {
        match format.bits_per_sample {
            8 => Ok(Self::Pcm8),
            16 => {
                if format.big_endian {
                    Ok(Self::Pcm16Be)
                } else {
                    Ok(Self::Pcm16Le)
                }
            }
            bits => Err(AudioError::UnsupportedFormat(format!(
                "{bits} bits per sample"
            ))),
        }
    }

    /// Number of bytes per encoded sample
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            Self::Pcm8 => 1,
            Self::Pcm16Le | Self::Pcm16Be => 2,
        }
    }

    /// Maximum positive amplitude expressible in this format
    ///
    /// The negative range extends one step further; the minimum of the two
    /// magnitudes is returned.
    pub fn max_amplitude(&self) -> i32 {
        match self {
            Self::Pcm8 => 0x7f,
            Self::Pcm16Le | Self::Pcm16Be => 0x7fff,
        }
    }

    /// Saturating clamp to the format's representable range
    pub fn clamp(&self, sample: i32) -> i32 {
        let max = self.max_amplitude();
        if sample > 0 {
            sample.min(max)
        } else {
            sample.max(-max - 1)
        }
    }

    /// Encode a sample as bytes
    ///
    /// Returns the encoded bytes in a fixed buffer together with the
    /// number of valid bytes.
    ///
    /// # Errors
    /// Returns `SampleOutOfRange` when the sample does not fit the format.
    /// Callers are expected to clamp first; this is an invariant check,
    /// not a saturation step.
    pub fn encode(&self, sample: i32) -> Result<([u8; 2], usize)> {
        let max = self.max_amplitude();
        if sample > max || sample < -max - 1 {
            return Err(AudioError::SampleOutOfRange { sample, limit: max });
        }
        match self {
            Self::Pcm8 => Ok(([sample as u8, 0], 1)),
            Self::Pcm16Le => {
                let bytes = (sample as i16).to_le_bytes();
                Ok(([bytes[0], bytes[1]], 2))
            }
            Self::Pcm16Be => {
                let bytes = (sample as i16).to_be_bytes();
                Ok(([bytes[0], bytes[1]], 2))
            }
        }
    }
}

/// Streaming byte-to-sample decoder
///
/// Feed bytes with [`update`](Self::update); when it returns `true` the
/// completed sample is available from [`get`](Self::get). 16-bit samples
/// complete on every second byte, so a partial sample may be held across
/// calls indefinitely.
#[derive(Debug, Clone)]
pub struct SampleDecoder {
    format: SampleFormat,
    pending: Option<u8>,
    sample: i32,
}

impl SampleDecoder {
    /// Create a decoder for the given format
    pub fn new(format: SampleFormat) -> Self {
        Self {
            format,
            pending: None,
            sample: 0,
        }
    }

    /// The format this decoder reads
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Push one byte of input
    ///
    /// Returns `true` when the byte completed a sample.
    pub fn update(&mut self, byte: u8) -> bool {
        match self.format {
            SampleFormat::Pcm8 => {
                self.sample = i32::from(byte as i8);
                true
            }
            SampleFormat::Pcm16Le => match self.pending.take() {
                None => {
                    self.pending = Some(byte);
                    false
                }
                Some(low) => {
                    self.sample = i32::from(i16::from_le_bytes([low, byte]));
                    true
                }
            },
            SampleFormat::Pcm16Be => match self.pending.take() {
                None => {
                    self.pending = Some(byte);
                    false
                }
                Some(high) => {
                    self.sample = i32::from(i16::from_be_bytes([high, byte]));
                    true
                }
            },
        }
    }

    /// The most recently completed sample
    ///
    /// Only meaningful after [`update`](Self::update) returned `true`.
    pub fn get(&self) -> i32 {
        self.sample
    }
}
