//! Level metering and event dispatch
//!
//! The pipeline reports input levels and gain changes for UI meters.
//! Events are subsampled to roughly 30 per second per channel and handed
//! off over channels, so a slow or blocked consumer never stalls the
//! audio thread. With no subscribers the subsampling cursor still
//! advances and nothing is delivered.

use crossbeam_channel::{unbounded, Receiver, Sender};
use reel_core::AudioFormat;
use serde::{Deserialize, Serialize};

use crate::codec::SampleFormat;
use crate::error::Result;
use crate::filter::SampleSink;

/// Events emitted by the metering tap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeterEvent {
    /// Input amplitude for one channel, normalized to [0, ~1]
    Amplitude {
        /// Source channel the sample belongs to
        channel: usize,
        /// Absolute amplitude relative to full scale
        amplitude: f64,
    },

    /// Current gain applied to one channel
    Gain {
        /// Source channel the event is reported for
        channel: usize,
        /// Linear gain factor
        gain: f64,
    },
}

/// Subsampled level tap
///
/// Observes every sample but only emits events every ⌊rate/30⌋ frames.
/// The channel cursor cycles through all source channels, so meters stay
/// per-channel even when gain is shared across channels.
#[derive(Debug)]
pub struct Meter {
    /// Source channel of the next observed sample
    channel: usize,
    channels: usize,
    /// Frames observed so far
    frames: usize,
    frames_per_update: usize,
    max_amplitude: f64,
    subscribers: Vec<Sender<MeterEvent>>,
}

impl Meter {
    /// Create a meter for the given stream parameters
    pub fn new(format: &AudioFormat, sample_format: SampleFormat) -> Self {
        Self {
            channel: 0,
            channels: usize::from(format.channels),
            frames: 0,
            // ~30 updates per second per channel
            frames_per_update: (format.sample_rate.as_hz() / 30).max(1) as usize,
            max_amplitude: f64::from(sample_format.max_amplitude()),
            subscribers: Vec::new(),
        }
    }

    /// Subscribe to meter events
    ///
    /// Returns the receiving end of an unbounded channel. Dropping the
    /// receiver unsubscribes; delivery to the remaining subscribers is
    /// unaffected.
    pub fn subscribe(&mut self) -> Receiver<MeterEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Observe one incoming sample
    pub fn observe(&mut self, sample: i32) {
        self.observe_with_gain(sample, None);
    }

    /// Observe one incoming sample along with the gain applied to it
    ///
    /// At each update point the gain event is sent before the amplitude
    /// event, both labelled with the current source channel.
    pub fn observe_with_gain(&mut self, sample: i32, gain: Option<f64>) {
        if self.frames % self.frames_per_update == 0 {
            let channel = self.channel;
            if let Some(gain) = gain {
                self.publish(MeterEvent::Gain { channel, gain });
            }
            let amplitude = f64::from(sample).abs() / self.max_amplitude;
            self.publish(MeterEvent::Amplitude { channel, amplitude });
        }

        self.channel += 1;
        self.channel %= self.channels;
        if self.channel == 0 {
            self.frames += 1;
        }
    }

    fn publish(&mut self, event: MeterEvent) {
        // A send only fails when the receiver is gone; drop that
        // subscriber and keep delivering to the rest.
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

/// Sample sink wrapper that meters amplitude on write
///
/// Used for the monitoring-only pipeline when normalization is disabled;
/// the normalizer taps its own meter before the delay line instead, so
/// meters reflect live input rather than delayed output.
pub struct Monitor<T: SampleSink> {
    meter: Meter,
    inner: T,
}

impl<T: SampleSink> Monitor<T> {
    /// Wrap a sample sink with a metering tap
    pub fn new(format: &AudioFormat, sample_format: SampleFormat, inner: T) -> Self {
        Self {
            meter: Meter::new(format, sample_format),
            inner,
        }
    }

    /// Subscribe to amplitude events
    pub fn subscribe(&mut self) -> Receiver<MeterEvent> {
        self.meter.subscribe()
    }

    /// Access the wrapped sink
    pub fn sink(&self) -> &T {
        &self.inner
    }

    /// Mutable access to the wrapped sink
    pub fn sink_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: SampleSink> SampleSink for Monitor<T> {
    fn write_sample(&mut self, sample: i32) -> Result<()> {
        self.meter.observe(sample);
        self.inner.write_sample(sample)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}
