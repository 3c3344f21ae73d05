use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Invalid channel {channel}: manager has {channel_count} channels")]
    InvalidChannel { channel: usize, channel_count: usize },

    #[error("Invalid resize target {requested}: must be within [{min}, {max}]")]
    InvalidResizeTarget {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio stream error: {0}")]
    AudioStream(String),
}

pub type Result<T> = std::result::Result<T, BufferError>;
