//! Size limits and defaults for the real-time buffer manager.

/// Smallest per-channel capacity accepted by `resize`.
pub const MIN_BUFFER_SIZE: usize = 512;

/// Largest per-channel capacity accepted by `resize`.
pub const MAX_BUFFER_SIZE: usize = 65536;

/// Default per-channel capacity in samples.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Default number of audio channels (stereo).
pub const DEFAULT_CHANNEL_COUNT: usize = 2;

/// Default sample rate in Hz. Only used for millisecond conversions.
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Default producer/consumer block size in frames.
pub const DEFAULT_BLOCK_SIZE: usize = 1024;
