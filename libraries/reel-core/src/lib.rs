//! Reel Core
//!
//! Platform-agnostic types, configuration, and error handling for Reel.
//!
//! This crate provides the foundational building blocks shared by the audio
//! pipeline and any application shell built on top of it:
//! - **Domain Types**: `AudioFormat`, `SampleRate`
//! - **Configuration**: `RecordingConfig`, `NormalizeConfig`, `EncodingConfig`
//! - **Error Handling**: Unified `ReelError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use reel_core::types::{AudioFormat, NormalizeConfig, SampleRate};
//!
//! // CD-quality stereo, little-endian
//! let format = AudioFormat::new(SampleRate::new(44_100), 2, 16, false);
//! assert_eq!(format.byte_rate(), 176_400);
//!
//! // Normalization settings with a two-second look-ahead window
//! let normalize = NormalizeConfig::default();
//! assert!(normalize.validate().is_ok());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{ReelError, Result};
pub use types::{
    AudioFormat,
    BitRate,
    ChannelMode,
    EncodingConfig,
    Mp3Settings,
    NormalizeConfig,
    RecordingConfig,
    SampleRate,
};
