use std::sync::atomic::{AtomicU64, Ordering};

/// Cumulative overrun/underrun counters
///
/// Shared through an `Arc` so a monitoring thread can poll the counters while
/// the manager itself stays confined to the audio thread.
#[derive(Debug, Default)]
pub struct BufferMetrics {
    underruns: AtomicU64,
    overruns: AtomicU64,
}

impl BufferMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn underrun_count(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }

    pub fn overrun_count(&self) -> u64 {
        self.overruns.load(Ordering::Relaxed)
    }

    pub(crate) fn record_underrun(&self) {
        self.underruns.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_overrun(&self) {
        self.overruns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.underruns.store(0, Ordering::Relaxed);
        self.overruns.store(0, Ordering::Relaxed);
    }
}
