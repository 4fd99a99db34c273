//! Reel Audio
//!
//! Streaming audio normalization and recording pipeline for Reel.
//!
//! This crate provides:
//! - On-the-fly peak normalization with bounded look-ahead and smooth gain
//!   ramping, plus per-channel DC offset cancellation
//! - A PCM sample codec (signed 8-bit, 16-bit LE/BE) with a streaming
//!   byte-at-a-time decoder
//! - Level metering with asynchronous event delivery for UI meters
//! - Streaming WAV container output and an external LAME encoder wrapper
//!
//! The pipeline is push-style: stages implement [`ByteSink`] or
//! [`SampleSink`] and forward to the stage they own. Bytes written into
//! the chain come out normalized in the same sample format, delayed by
//! the look-ahead window.
//!
//! # Example: Normalizing a stream
//!
//! ```rust
//! use reel_audio::{AudioFilter, ByteSink, Normalizer};
//! use reel_audio::test_utils::MemorySink;
//! use reel_core::{AudioFormat, NormalizeConfig, SampleRate};
//!
//! # fn example() -> reel_audio::Result<()> {
//! let format = AudioFormat::new(SampleRate::new(44_100), 2, 16, false);
//! let config = NormalizeConfig {
//!     window_seconds: 1.0,
//!     max_gain: 30.0,
//!     ..NormalizeConfig::default()
//! };
//!
//! let sink = MemorySink::new();
//! let normalizer = Normalizer::new(sink, &format, &config)?;
//! let mut stream = AudioFilter::for_format(&format, normalizer)?;
//!
//! stream.write(&[0x00, 0x10, 0x00, 0x10])?; // one stereo frame
//! stream.close()?;
//! # Ok(())
//! # }
//! ```

mod codec;
mod dc;
pub mod encoder;
mod error;
mod filter;
mod gain;
mod monitor;
mod normalizer;
pub mod ring;
mod sink;
pub mod test_utils;
mod wave;

pub use codec::{SampleDecoder, SampleFormat};
pub use dc::DcCanceller;
pub use encoder::LameEncoder;
pub use error::{AudioError, Result};
pub use filter::{AudioFilter, SampleSink, SampleWriter};
pub use gain::GainControl;
pub use monitor::{Meter, MeterEvent, Monitor};
pub use normalizer::Normalizer;
pub use ring::{RollingMax, RollingWindow};
pub use sink::{ByteSink, IoSink, NullSink};
pub use wave::WaveWriter;
