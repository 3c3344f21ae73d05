use serde::Serialize;

/// Point-in-time view of one channel, for meters and health panels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BufferStatus {
    pub channel: usize,
    pub available_samples: usize,
    pub latency_ms: f32,
    pub write_cursor: usize,
    pub read_cursor: usize,
}

/// Snapshot of the whole manager: per-channel status plus counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub buffer_size: usize,
    pub sample_rate: u32,
    pub underruns: u64,
    pub overruns: u64,
    pub channels: Vec<BufferStatus>,
}

impl StatusReport {
    /// Largest queued latency across channels
    pub fn max_latency_ms(&self) -> f32 {
        self.channels
            .iter()
            .map(|c| c.latency_ms)
            .fold(0.0, f32::max)
    }

    /// Fill level of the fullest channel as a fraction of usable capacity
    pub fn max_fill_ratio(&self) -> f32 {
        let usable = self.buffer_size.saturating_sub(1).max(1) as f32;
        self.channels
            .iter()
            .map(|c| c.available_samples as f32 / usable)
            .fold(0.0, f32::max)
    }
}
