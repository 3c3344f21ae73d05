//! Configuration for the real-time buffer manager and its audio pipeline.
//!
//! Configuration can be built in code, loaded from a TOML file, or both
//! (file values first, then command-line overrides):
//!
//! ```toml
//! [buffer]
//! buffer_size = 8192
//! channels = 2
//! sample_rate = 48000
//!
//! [audio]
//! block_size = 1024
//! consumer_block = 1024
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_BUFFER_SIZE, DEFAULT_CHANNEL_COUNT, DEFAULT_SAMPLE_RATE,
    MAX_BUFFER_SIZE, MIN_BUFFER_SIZE,
};
use crate::error::{BufferError, Result};

/// Where the producer side of the pipeline gets its samples from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Default cpal input device
    Device,
    /// Generated sine tones, one frequency per channel
    Synthetic,
}

/// Top-level configuration
///
/// # Example
/// ```
/// use rtbuffer::config::AppConfig;
///
/// let config = AppConfig::from_toml_str("[buffer]\nbuffer_size = 4096\n").unwrap();
/// assert_eq!(config.buffer.buffer_size, 4096);
/// assert_eq!(config.buffer.channels, 2);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Ring buffer geometry
    pub buffer: BufferConfig,
    /// Producer/consumer block sizing
    pub audio: AudioConfig,
}

/// Ring buffer geometry shared by every channel
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Capacity of each channel in samples
    pub buffer_size: usize,
    /// Number of channels, fixed for the lifetime of the manager
    pub channels: usize,
    /// Sample rate in Hz, used for millisecond conversions only
    pub sample_rate: u32,
}

/// Block sizing for the producer and consumer sides
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Frames per producer block (device callback or synthetic source)
    pub block_size: usize,
    /// Frames the consumer requests from each channel per cycle
    pub consumer_block: usize,
    /// Producer source
    pub source: SourceKind,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            channels: DEFAULT_CHANNEL_COUNT,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            consumer_block: DEFAULT_BLOCK_SIZE,
            source: SourceKind::Synthetic,
        }
    }
}

impl BufferConfig {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&self.buffer_size) {
            return Err(BufferError::Config(format!(
                "buffer_size {} outside [{}, {}]",
                self.buffer_size, MIN_BUFFER_SIZE, MAX_BUFFER_SIZE
            )));
        }
        if self.channels == 0 {
            return Err(BufferError::Config(
                "channels must be at least 1".to_string(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(BufferError::Config(
                "sample_rate must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl AudioConfig {
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 || self.consumer_block == 0 {
            return Err(BufferError::Config(
                "block sizes must be at least 1 frame".to_string(),
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Parse a TOML document. Missing sections and fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| BufferError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| BufferError::Config(format!("{}: {}", path.display(), e)))?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.buffer.validate()?;
        self.audio.validate()
    }

    /// Duration of one consumer block in milliseconds
    pub fn consumer_block_ms(&self) -> f32 {
        self.audio.consumer_block as f32 / self.buffer.sample_rate as f32 * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.buffer.buffer_size, 8192);
        assert_eq!(config.buffer.channels, 2);
        assert_eq!(config.buffer.sample_rate, 48000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            "[buffer]\nchannels = 6\n\n[audio]\nsource = \"device\"\n",
        )
        .unwrap();
        assert_eq!(config.buffer.channels, 6);
        assert_eq!(config.buffer.buffer_size, 8192);
        assert_eq!(config.audio.source, SourceKind::Device);
    }

    #[test]
    fn test_out_of_range_buffer_size_rejected() {
        let err = AppConfig::from_toml_str("[buffer]\nbuffer_size = 100\n").unwrap_err();
        assert!(matches!(err, BufferError::Config(_)));

        let err = AppConfig::from_toml_str("[buffer]\nbuffer_size = 100000\n").unwrap_err();
        assert!(matches!(err, BufferError::Config(_)));
    }

    #[test]
    fn test_zero_channels_rejected() {
        let config = BufferConfig {
            channels: 0,
            ..BufferConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[buffer\n").unwrap_err();
        assert!(matches!(err, BufferError::Config(_)));
    }

    #[test]
    fn test_consumer_block_ms() {
        let config = AppConfig {
            audio: AudioConfig {
                consumer_block: 480,
                ..AudioConfig::default()
            },
            ..AppConfig::default()
        };
        assert!((config.consumer_block_ms() - 10.0).abs() < 1e-4);
    }
}
