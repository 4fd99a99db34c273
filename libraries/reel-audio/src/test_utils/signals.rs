//! Test signal generation
//!
//! Signals are produced as signed integer samples in the target format's
//! range, mono or already interleaved, plus helpers to encode them as the
//! byte streams the pipeline consumes.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::codec::SampleFormat;

/// Generate a mono sine wave
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `frames` - Number of samples to generate
/// * `amplitude` - Peak amplitude in sample units
pub fn sine(frequency: f64, sample_rate: u32, frames: usize, amplitude: i32) -> Vec<i32> {
    (0..frames)
        .map(|i| {
            let t = i as f64 / f64::from(sample_rate);
            ((2.0 * PI * frequency * t).sin() * f64::from(amplitude)).round() as i32
        })
        .collect()
}

/// Generate a single impulse surrounded by silence
///
/// The impulse is placed at `position`; everything else is zero.
pub fn impulse(frames: usize, position: usize, amplitude: i32) -> Vec<i32> {
    let mut samples = vec![0; frames];
    if position < frames {
        samples[position] = amplitude;
    }
    samples
}

/// Generate uniformly distributed samples in `[low, high]`
///
/// Deterministic for a given seed so failures reproduce.
pub fn uniform(low: i32, high: i32, count: usize, seed: u64) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(low..=high)).collect()
}

/// Duplicate a mono signal across two interleaved channels
pub fn interleave_stereo(mono: &[i32]) -> Vec<i32> {
    let mut samples = Vec::with_capacity(mono.len() * 2);
    for &sample in mono {
        samples.push(sample);
        samples.push(sample);
    }
    samples
}

/// Encode samples as the byte stream for a sample format
///
/// Samples must already be in range; this is a test helper, not a
/// clamping encoder.
pub fn encode(format: SampleFormat, samples: &[i32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * format.bytes_per_sample());
    for &sample in samples {
        match format {
            SampleFormat::Pcm8 => bytes.push(sample as u8),
            SampleFormat::Pcm16Le => bytes.extend_from_slice(&(sample as i16).to_le_bytes()),
            SampleFormat::Pcm16Be => bytes.extend_from_slice(&(sample as i16).to_be_bytes()),
        }
    }
    bytes
}

/// Decode a byte stream back into samples
pub fn decode(format: SampleFormat, bytes: &[u8]) -> Vec<i32> {
    match format {
        SampleFormat::Pcm8 => bytes.iter().map(|&b| i32::from(b as i8)).collect(),
        SampleFormat::Pcm16Le => bytes
            .chunks_exact(2)
            .map(|pair| i32::from(i16::from_le_bytes([pair[0], pair[1]])))
            .collect(),
        SampleFormat::Pcm16Be => bytes
            .chunks_exact(2)
            .map(|pair| i32::from(i16::from_be_bytes([pair[0], pair[1]])))
            .collect(),
    }
}
