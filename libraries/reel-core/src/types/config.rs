/// Recording configuration types
///
/// These types model the configuration document for a recording session:
/// the capture format, optional normalization settings, and the optional
/// encoding stage. Parsing and persistence of the document belong to the
/// application shell; this module only defines the shape and validation.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ReelError, Result};
use crate::types::AudioFormat;

/// Configuration for one recording session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Format of the captured audio
    pub audio_format: AudioFormat,

    /// Normalization settings; `None` disables normalization
    #[serde(default)]
    pub normalize: Option<NormalizeConfig>,

    /// Encoding stage; `None` stores raw PCM
    #[serde(default)]
    pub encode: Option<EncodingConfig>,
}

impl RecordingConfig {
    /// Validate the whole configuration
    ///
    /// # Errors
    /// Returns a configuration error for an invalid audio format or
    /// normalization settings.
    pub fn validate(&self) -> Result<()> {
        self.audio_format.validate()?;
        if let Some(normalize) = &self.normalize {
            normalize.validate()?;
        }
        Ok(())
    }
}

/// Normalization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Duration of the look-ahead window in seconds
    pub window_seconds: f64,

    /// Maximum gain applied to input samples
    pub max_gain: f64,

    /// Whether each channel is normalized independently
    #[serde(default)]
    pub per_channel: bool,

    /// Whether DC bias is estimated and removed per channel
    #[serde(default = "default_dc_offset_enabled")]
    pub dc_offset_enabled: bool,
}

fn default_dc_offset_enabled() -> bool {
    true
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            window_seconds: 2.0,
            max_gain: 10.0,
            per_channel: false,
            dc_offset_enabled: true,
        }
    }
}

impl NormalizeConfig {
    /// Validate the settings
    ///
    /// # Errors
    /// Returns a configuration error for a non-positive window or a
    /// maximum gain below 1.0.
    pub fn validate(&self) -> Result<()> {
        if !(self.window_seconds > 0.0) {
            return Err(ReelError::config("window_seconds must be positive"));
        }
        if !(self.max_gain >= 1.0) {
            return Err(ReelError::config("max_gain must be at least 1.0"));
        }
        Ok(())
    }
}

/// Format used to encode recordings before they are written to storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum EncodingConfig {
    /// RIFF/WAVE container around the raw PCM stream
    Wave,

    /// MP3 via an external LAME process
    Mp3(Mp3Settings),
}

/// Command-line options for the LAME encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mp3Settings {
    /// Path to the LAME executable
    pub executable: PathBuf,

    /// Channel mode; `None` lets LAME decide
    #[serde(default)]
    pub mode: Option<ChannelMode>,

    /// Bit rate selection; `None` uses LAME's default
    #[serde(default)]
    pub bit_rate: Option<BitRate>,

    /// Additional arguments appended verbatim (e.g. ID3 tagging flags)
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for Mp3Settings {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("lame"),
            mode: None,
            bit_rate: None,
            extra_args: Vec::new(),
        }
    }
}

/// MP3 channel mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    Mono,
}

/// MP3 bit rate selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitRate {
    /// Constant bit rate in kbit/s; `None` uses the encoder's default rate
    Constant(Option<u32>),
    /// Average bit rate in kbit/s
    Average(u32),
    /// Variable bit rate quality (0 = best, 9 = worst); `None` uses the
    /// encoder's default quality
    Variable(Option<u32>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SampleRate;

    #[test]
    fn normalize_defaults() {
        let config = NormalizeConfig::default();
        assert_eq!(config.window_seconds, 2.0);
        assert_eq!(config.max_gain, 10.0);
        assert!(!config.per_channel);
        assert!(config.dc_offset_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn dc_offset_defaults_to_enabled_in_documents() {
        let json = r#"{"window_seconds":1.0,"max_gain":30.0}"#;
        let config: NormalizeConfig = serde_json::from_str(json).unwrap();
        assert!(config.dc_offset_enabled);
        assert!(!config.per_channel);
    }

    #[test]
    fn normalize_validation() {
        let mut config = NormalizeConfig::default();

        config.window_seconds = 0.0;
        assert!(config.validate().is_err());

        config.window_seconds = 1.0;
        config.max_gain = 0.5;
        assert!(config.validate().is_err());

        config.max_gain = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn recording_config_round_trip() {
        let config = RecordingConfig {
            audio_format: AudioFormat::new(SampleRate::new(44_100), 2, 16, false),
            normalize: Some(NormalizeConfig {
                window_seconds: 1.0,
                max_gain: 30.0,
                per_channel: true,
                dc_offset_enabled: false,
            }),
            encode: Some(EncodingConfig::Mp3(Mp3Settings {
                bit_rate: Some(BitRate::Average(192)),
                ..Mp3Settings::default()
            })),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: RecordingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn bit_rate_values_are_nullable() {
        let json = serde_json::to_value(BitRate::Constant(None)).unwrap();
        assert!(json["constant"].is_null());

        let parsed: BitRate = serde_json::from_str(r#"{"constant":128}"#).unwrap();
        assert_eq!(parsed, BitRate::Constant(Some(128)));

        let parsed: BitRate = serde_json::from_str(r#"{"variable":null}"#).unwrap();
        assert_eq!(parsed, BitRate::Variable(None));
    }

    #[test]
    fn encoding_config_tagged_by_format() {
        let json = serde_json::to_value(EncodingConfig::Wave).unwrap();
        assert_eq!(json["format"], "wave");

        let mp3 = EncodingConfig::Mp3(Mp3Settings::default());
        let json = serde_json::to_value(&mp3).unwrap();
        assert_eq!(json["format"], "mp3");
    }
}
