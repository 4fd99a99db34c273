/// Core error types for Reel
use thiserror::Error;

/// Result type alias using `ReelError`
pub type Result<T> = std::result::Result<T, ReelError>;

/// Core error type for Reel
#[derive(Error, Debug)]
pub enum ReelError {
    /// Configuration errors (invalid or unsupported settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audio processing errors
    #[error("Audio error: {0}")]
    Audio(String),

    /// External encoder errors
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ReelError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Create an encoder error
    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
