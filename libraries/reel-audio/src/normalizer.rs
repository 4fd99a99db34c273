//! Streaming normalizer
//!
//! Applies a smoothly ramped, time-varying gain to an interleaved PCM
//! stream so peaks approach full scale without clipping, and removes slow
//! DC bias per channel. Samples are delayed through a rolling window; the
//! gain applied to each outgoing sample was computed with one full window
//! of look-ahead, so the gain rises *before* a loud section arrives and
//! steady-state output never needs clamping.

use crossbeam_channel::Receiver;
use reel_core::{AudioFormat, NormalizeConfig};

use crate::codec::SampleFormat;
use crate::dc::DcCanceller;
use crate::error::{AudioError, Result};
use crate::filter::{SampleSink, SampleWriter};
use crate::gain::GainControl;
use crate::monitor::{Meter, MeterEvent};
use crate::ring::{RollingMax, RollingWindow};
use crate::sink::ByteSink;

/// Normalizing sample sink
///
/// Consumes decoded samples, delays them by the configured window, and
/// emits them amplified into the wrapped byte sink in the same sample
/// format. Wrap in an [`AudioFilter`](crate::filter::AudioFilter) to feed
/// raw bytes.
///
/// All state lives on the writer's thread; only the meter subscriptions
/// cross threads.
pub struct Normalizer<S: ByteSink> {
    out: SampleWriter<S>,
    format: SampleFormat,

    /// Delay line holding samples of all channels, interleaved
    window: RollingWindow<i32>,
    /// Per-track maximum over the samples currently in the window
    maxima: Vec<RollingMax<i32>>,
    /// Per-track gain state
    gains: Vec<GainControl>,
    /// Gain-track cursor; always 0 when gain is shared
    track: usize,

    dc: DcCanceller,
    /// Source-channel cursor for the DC estimator
    source: usize,
    channels: usize,

    meter: Meter,

    /// Emitted samples that needed clamping after amplification
    saturated: u64,
}

impl<S: ByteSink> Normalizer<S> {
    /// Create a normalizer writing into `out`
    ///
    /// # Errors
    /// Returns a configuration error for an unsupported sample format,
    /// invalid normalization settings, or a window too short to hold one
    /// sample per channel.
    pub fn new(out: S, format: &AudioFormat, config: &NormalizeConfig) -> Result<Self> {
        format
            .validate()
            .map_err(|err| AudioError::InvalidConfig(err.to_string()))?;
        config
            .validate()
            .map_err(|err| AudioError::InvalidConfig(err.to_string()))?;

        let sample_format = SampleFormat::from_audio_format(format)?;
        let channels = usize::from(format.channels);
        let rate = format.sample_rate.as_hz();

        let samples_per_window = (f64::from(rate) * channels as f64 * config.window_seconds) as usize;
        if samples_per_window < channels {
            return Err(AudioError::InvalidConfig(format!(
                "window of {} s holds no sample for every channel",
                config.window_seconds
            )));
        }

        // With shared gain the whole stream is treated as one track.
        let tracks = if config.per_channel { channels } else { 1 };
        let samples_per_track = if config.per_channel {
            samples_per_window / channels
        } else {
            samples_per_window
        };

        let max_amplitude = sample_format.max_amplitude();
        let maxima = (0..tracks).map(|_| RollingMax::new(samples_per_track)).collect();
        let gains = (0..tracks)
            .map(|_| GainControl::new(max_amplitude, samples_per_track, config.max_gain))
            .collect();

        let mut dc = DcCanceller::new(channels, rate);
        dc.set_enabled(config.dc_offset_enabled);

        Ok(Self {
            out: SampleWriter::new(sample_format, out),
            format: sample_format,
            window: RollingWindow::new(samples_per_window),
            maxima,
            gains,
            track: 0,
            dc,
            source: 0,
            channels,
            meter: Meter::new(format, sample_format),
            saturated: 0,
        })
    }

    /// Subscribe to amplitude and gain events
    pub fn subscribe(&mut self) -> Receiver<MeterEvent> {
        self.meter.subscribe()
    }

    /// Whether DC offset correction is enabled
    pub fn is_dc_offset_enabled(&self) -> bool {
        self.dc.is_enabled()
    }

    /// Enable or disable DC offset correction at runtime
    pub fn set_dc_offset_enabled(&mut self, enabled: bool) {
        self.dc.set_enabled(enabled);
    }

    /// The current DC offset estimate for a source channel
    pub fn dc_offset(&self, channel: usize) -> f64 {
        self.dc.offset(channel)
    }

    /// The current gain for a track
    pub fn gain(&self, track: usize) -> f64 {
        self.gains[track].get()
    }

    /// Number of independent gain tracks (channel count, or 1 when shared)
    pub fn tracks(&self) -> usize {
        self.gains.len()
    }

    /// Number of samples buffered in the delay window
    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    /// Emitted samples that required clamping after amplification
    ///
    /// Non-zero counts indicate transients steeper than the look-ahead
    /// window could anticipate; under bounded input they stay rare.
    pub fn saturated_samples(&self) -> u64 {
        self.saturated
    }

    /// Access the downstream byte sink
    pub fn sink(&self) -> &S {
        self.out.sink()
    }

    /// Amplify a delayed sample with the current track gain and emit it
    fn emit(&mut self, sample: i32) -> Result<()> {
        let gain = self.gains[self.track].get();
        let amplified = (f64::from(sample) * gain).round() as i32;
        let clamped = self.format.clamp(amplified);
        if clamped != amplified {
            // Steady-state emission stays in range; a transient larger
            // than anything in the window can still overshoot by design.
            self.saturated += 1;
            tracing::debug!(sample, amplified, clamped, "clamped sample after normalization");
        }
        self.out.write_sample(clamped)
    }

    fn next_track(&mut self) {
        self.track += 1;
        self.track %= self.gains.len();
    }
}

impl<S: ByteSink> SampleSink for Normalizer<S> {
    fn write_sample(&mut self, sample: i32) -> Result<()> {
        // Update the gain for this track first: the maximum already
        // includes a full window of look-ahead past the sample about to
        // leave, so the emitted sample was anticipated.
        let maximum = self.maxima[self.track].get();
        self.gains[self.track].update(maximum);

        let adjusted = self.dc.apply(self.source, sample);

        // Push into the delay line; once the window is full every push
        // ejects the sample written one window earlier.
        let window_full = self.window.is_full();
        let ejected = self.window.add(adjusted);
        if window_full {
            self.emit(ejected)?;
        }

        // Meters reflect live input, not the delayed output.
        let gain = self.gains[self.track].get();
        self.meter.observe_with_gain(adjusted, Some(gain));

        // Keep the rolling maximum paced with the window contents. The
        // ejected value is zero while the window is still filling, which
        // never matches a live maximum.
        self.maxima[self.track].remove(ejected.abs());
        self.maxima[self.track].add(adjusted.abs())?;

        self.source = (self.source + 1) % self.channels;
        self.next_track();
        Ok(())
    }

    /// Drain the delay window and flush downstream
    ///
    /// Remaining samples are emitted with the gains as they stand; there
    /// is no further input to look ahead at, so the gains are not
    /// recomputed. If the downstream sink fails mid-drain the remaining
    /// samples are still taken out of the window and the maxima stay
    /// paced, so the normalizer is left consistent; the first error is
    /// returned once the window is empty.
    fn flush(&mut self) -> Result<()> {
        let mut first_error = None;

        while !self.window.is_empty() {
            let flushed = self.window.remove();
            self.maxima[self.track].remove(flushed.abs());
            if let Err(err) = self.emit(flushed) {
                first_error.get_or_insert(err);
            }
            self.next_track();
        }

        match first_error {
            Some(err) => Err(err),
            None => self.out.flush(),
        }
    }

    fn close(&mut self) -> Result<()> {
        let drained = self.flush();
        let closed = self.out.close();
        drained.and(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::NullSink;
    use reel_core::SampleRate;

    fn stereo_format(rate: u32) -> AudioFormat {
        AudioFormat::new(SampleRate::new(rate), 2, 16, false)
    }

    fn config(window_seconds: f64, max_gain: f64, per_channel: bool) -> NormalizeConfig {
        NormalizeConfig {
            window_seconds,
            max_gain,
            per_channel,
            ..NormalizeConfig::default()
        }
    }

    #[test]
    fn sizes_follow_configuration() {
        let normalizer =
            Normalizer::new(NullSink, &stereo_format(4410), &config(1.0, 30.0, false)).unwrap();
        assert_eq!(normalizer.window.capacity(), 8820);
        assert_eq!(normalizer.tracks(), 1);
        assert_eq!(normalizer.maxima[0].window_size(), 8820);

        let per_channel =
            Normalizer::new(NullSink, &stereo_format(4410), &config(1.0, 30.0, true)).unwrap();
        assert_eq!(per_channel.window.capacity(), 8820);
        assert_eq!(per_channel.tracks(), 2);
        assert_eq!(per_channel.maxima[0].window_size(), 4410);
    }

    #[test]
    fn rejects_unsupported_format() {
        let format = AudioFormat::new(SampleRate::new(4410), 2, 24, false);
        assert!(matches!(
            Normalizer::new(NullSink, &format, &config(1.0, 30.0, false)),
            Err(AudioError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn rejects_invalid_settings() {
        assert!(matches!(
            Normalizer::new(NullSink, &stereo_format(4410), &config(0.0, 30.0, false)),
            Err(AudioError::InvalidConfig(_))
        ));
        assert!(matches!(
            Normalizer::new(NullSink, &stereo_format(4410), &config(1.0, 0.5, false)),
            Err(AudioError::InvalidConfig(_))
        ));
        let zero_channels = AudioFormat::new(SampleRate::new(4410), 0, 16, false);
        assert!(matches!(
            Normalizer::new(NullSink, &zero_channels, &config(1.0, 30.0, false)),
            Err(AudioError::InvalidConfig(_))
        ));
    }

    #[test]
    fn output_is_delayed_by_one_window() {
        let format = AudioFormat::new(SampleRate::new(100), 1, 16, false);
        let mut normalizer =
            Normalizer::new(IoCounter::default(), &format, &config(1.0, 30.0, false)).unwrap();

        for _ in 0..100 {
            normalizer.write_sample(0).unwrap();
        }
        assert_eq!(normalizer.sink().bytes, 0);

        normalizer.write_sample(0).unwrap();
        assert_eq!(normalizer.sink().bytes, 2);
    }

    #[test]
    fn flush_empties_the_window() {
        let format = AudioFormat::new(SampleRate::new(100), 1, 16, false);
        let mut normalizer =
            Normalizer::new(IoCounter::default(), &format, &config(1.0, 30.0, false)).unwrap();

        for _ in 0..42 {
            normalizer.write_sample(100).unwrap();
        }
        assert_eq!(normalizer.buffered(), 42);
        normalizer.flush().unwrap();
        assert_eq!(normalizer.buffered(), 0);
        assert_eq!(normalizer.sink().bytes, 84);
    }

    /// Byte sink counting what reaches it.
    #[derive(Default)]
    struct IoCounter {
        bytes: usize,
    }

    impl ByteSink for IoCounter {
        fn write(&mut self, buf: &[u8]) -> Result<()> {
            self.bytes += buf.len();
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }
}
