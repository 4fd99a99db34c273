//! Streaming RIFF/WAVE container writer
//!
//! Wraps a byte sink and prepends a 44-byte WAVE header before the first
//! payload byte. Because the stream length is unknown while recording,
//! the RIFF and data chunk sizes are written as the sentinel values
//! 0x80000024 and 0x80000000; players treat these as "read until EOF".
//! The sentinels are reproduced bit-exactly for compatibility with
//! existing recordings and downstream tools.

use reel_core::AudioFormat;

use crate::error::Result;
use crate::sink::ByteSink;

/// Byte sink that prefixes its output with a streaming WAVE header
pub struct WaveWriter<S: ByteSink> {
    out: S,
    format: AudioFormat,
    header_written: bool,
}

impl<S: ByteSink> WaveWriter<S> {
    /// Wrap `out`, describing the PCM payload with `format`
    pub fn new(out: S, format: AudioFormat) -> Self {
        Self {
            out,
            format,
            header_written: false,
        }
    }

    /// Access the underlying sink
    pub fn sink(&self) -> &S {
        &self.out
    }

    fn write_header(&mut self) -> Result<()> {
        let channels = self.format.channels;
        let sample_rate = self.format.sample_rate.as_hz();
        let bits_per_sample = self.format.bits_per_sample;

        let mut header = Vec::with_capacity(44);
        header.extend_from_slice(b"RIFF");
        // File size counting from the next byte; unknown while streaming.
        header.extend_from_slice(&0x8000_0024u32.to_le_bytes());
        header.extend_from_slice(b"WAVE");

        header.extend_from_slice(b"fmt ");
        header.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        header.extend_from_slice(&1u16.to_le_bytes()); // audio format = PCM
        header.extend_from_slice(&channels.to_le_bytes());
        header.extend_from_slice(&sample_rate.to_le_bytes());
        header.extend_from_slice(&self.format.byte_rate().to_le_bytes());
        header.extend_from_slice(&self.format.block_align().to_le_bytes());
        header.extend_from_slice(&bits_per_sample.to_le_bytes());

        header.extend_from_slice(b"data");
        // Data chunk size; unknown while streaming.
        header.extend_from_slice(&0x8000_0000u32.to_le_bytes());

        self.out.write(&header)?;
        self.header_written = true;
        Ok(())
    }
}

impl<S: ByteSink> ByteSink for WaveWriter<S> {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        if !self.header_written {
            self.write_header()?;
        }
        self.out.write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()
    }

    fn close(&mut self) -> Result<()> {
        self.out.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemorySink;
    use reel_core::SampleRate;

    #[test]
    fn header_precedes_first_byte() {
        let sink = MemorySink::new();
        let bytes = sink.clone();
        let format = AudioFormat::new(SampleRate::new(44_100), 2, 16, false);
        let mut writer = WaveWriter::new(sink, format);

        writer.write(&[0]).unwrap();
        writer.close().unwrap();

        let written = bytes.bytes();
        assert_eq!(written.len(), 45);
        assert_eq!(&written[0..4], b"RIFF");
        assert_eq!(&written[8..12], b"WAVE");
        assert_eq!(written[44], 0);
    }

    #[test]
    fn header_is_written_once() {
        let sink = MemorySink::new();
        let bytes = sink.clone();
        let format = AudioFormat::new(SampleRate::new(44_100), 2, 16, false);
        let mut writer = WaveWriter::new(sink, format);

        writer.write(&[1, 2]).unwrap();
        writer.write(&[3, 4]).unwrap();
        writer.close().unwrap();

        assert_eq!(bytes.bytes().len(), 48);
    }

    #[test]
    fn empty_stream_writes_no_header() {
        let sink = MemorySink::new();
        let bytes = sink.clone();
        let format = AudioFormat::new(SampleRate::new(44_100), 2, 16, false);
        let mut writer = WaveWriter::new(sink, format);

        writer.close().unwrap();
        assert!(bytes.bytes().is_empty());
    }
}
