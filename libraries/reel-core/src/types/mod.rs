//! Core domain types

mod audio;
mod config;

pub use audio::{AudioFormat, SampleRate};
pub use config::{
    BitRate, ChannelMode, EncodingConfig, Mp3Settings, NormalizeConfig, RecordingConfig,
};
