/// Audio-specific errors
use thiserror::Error;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio error types
#[derive(Error, Debug)]
pub enum AudioError {
    /// Unsupported sample format
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sample value outside the encodable range
    ///
    /// Indicates a defect in the caller: samples must be clamped before
    /// they reach the encoder.
    #[error("Sample out of range: {sample} (amplitude limit {limit})")]
    SampleOutOfRange { sample: i32, limit: i32 },

    /// Rolling maximum received more additions than removals
    #[error("Rolling maximum overflow: added values exceed the window size")]
    WindowOverflow,

    /// External encoder process failure
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// I/O error from the downstream sink
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<AudioError> for reel_core::ReelError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::UnsupportedFormat(msg) => reel_core::ReelError::config(msg),
            AudioError::InvalidConfig(msg) => reel_core::ReelError::config(msg),
            AudioError::Encoder(msg) => reel_core::ReelError::encoder(msg),
            AudioError::Io(err) => reel_core::ReelError::Io(err),
            other => reel_core::ReelError::audio(other.to_string()),
        }
    }
}
