pub mod audio;
pub mod buffer;
pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use buffer::{RealtimeBufferManager, RingBufferChannel};
pub use config::AppConfig;
pub use error::{BufferError, Result};
pub use processing::BufferPipeline;
