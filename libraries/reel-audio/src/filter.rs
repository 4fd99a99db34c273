//! Sample-level pipeline seams
//!
//! [`AudioFilter`] is the byte-to-sample front of every processing chain:
//! it decodes the incoming byte stream and feeds whole samples to a
//! [`SampleSink`]. [`SampleWriter`] is the terminal stage that encodes
//! samples back into bytes. A chain of `AudioFilter` directly over
//! `SampleWriter` is a pure passthrough and reproduces its input
//! byte-for-byte.

use reel_core::AudioFormat;

use crate::codec::{SampleDecoder, SampleFormat};
use crate::error::Result;
use crate::sink::ByteSink;

/// Destination for decoded audio samples
///
/// The sample-domain counterpart of [`ByteSink`]: processing stages accept
/// whole signed samples and forward to the stage they wrap.
pub trait SampleSink: Send {
    /// Write one decoded sample
    fn write_sample(&mut self, sample: i32) -> Result<()>;

    /// Drain buffered samples downstream
    fn flush(&mut self) -> Result<()>;

    /// Drain buffered samples and release the downstream stage
    fn close(&mut self) -> Result<()>;
}

/// Byte-to-sample front of a processing chain
///
/// Owns the codec's decode state, so partial samples may span `write`
/// calls without corrupting the stream.
pub struct AudioFilter<T: SampleSink> {
    decoder: SampleDecoder,
    sink: T,
}

impl<T: SampleSink> AudioFilter<T> {
    /// Create a filter decoding the given format into `sink`
    pub fn new(format: SampleFormat, sink: T) -> Self {
        Self {
            decoder: SampleDecoder::new(format),
            sink,
        }
    }

    /// Create a filter for an audio format
    ///
    /// # Errors
    /// Returns an error when the audio format has no supported sample
    /// format.
    pub fn for_format(format: &AudioFormat, sink: T) -> Result<Self> {
        Ok(Self::new(SampleFormat::from_audio_format(format)?, sink))
    }

    /// Access the wrapped sample sink
    pub fn sink(&self) -> &T {
        &self.sink
    }

    /// Mutable access to the wrapped sample sink
    pub fn sink_mut(&mut self) -> &mut T {
        &mut self.sink
    }
}

impl<T: SampleSink> ByteSink for AudioFilter<T> {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        for &byte in buf {
            if self.decoder.update(byte) {
                self.sink.write_sample(self.decoder.get())?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.sink.flush()
    }

    fn close(&mut self) -> Result<()> {
        self.sink.close()
    }
}

/// Terminal stage encoding samples into a byte sink
///
/// Rejects samples outside the format's range instead of wrapping them;
/// stages that amplify must clamp before writing.
pub struct SampleWriter<S: ByteSink> {
    format: SampleFormat,
    out: S,
}

impl<S: ByteSink> SampleWriter<S> {
    /// Create a writer encoding `format` into `out`
    pub fn new(format: SampleFormat, out: S) -> Self {
        Self { format, out }
    }

    /// The format this writer encodes
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Access the underlying byte sink
    pub fn sink(&self) -> &S {
        &self.out
    }

    /// Mutable access to the underlying byte sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.out
    }
}

impl<S: ByteSink> SampleSink for SampleWriter<S> {
    fn write_sample(&mut self, sample: i32) -> Result<()> {
        let (bytes, len) = self.format.encode(sample)?;
        self.out.write(&bytes[..len])
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()
    }

    fn close(&mut self) -> Result<()> {
        self.out.close()
    }
}
