//! Test utilities for the audio pipeline
//!
//! Provides integer-PCM test signal generation, byte-encoding helpers,
//! and sink instrumentation used by the unit and integration tests.

mod signals;
mod sinks;

pub use signals::*;
pub use sinks::*;
