use std::sync::Arc;

use super::channel::RingBufferChannel;
use super::metrics::BufferMetrics;
use super::observer::{
    ObserverSet, OverrunEvent, OverrunObserver, UnderrunEvent, UnderrunObserver,
};
use super::status::{BufferStatus, StatusReport};
use crate::config::BufferConfig;
use crate::constants::{MAX_BUFFER_SIZE, MIN_BUFFER_SIZE};
use crate::error::{BufferError, Result};

/// Multi-channel real-time ring buffer manager
///
/// Owns one [`RingBufferChannel`] per audio channel and is the only way to
/// touch their storage or cursors. Every channel has the same capacity.
///
/// # Real-time behaviour
///
/// `write`, `read_into`, and the query methods never block, never allocate,
/// and run in time proportional to the number of samples moved. `read`
/// allocates its result vector; use `read_into` inside an audio callback.
/// `resize` and `reset` are not real-time safe and must only be called
/// while no audio callback is running.
///
/// The manager takes `&mut self` for transfers, so it is owned by a single
/// thread. Cross-thread producers hand blocks over a channel (see
/// [`crate::processing::BufferPipeline`]); counters are shared through
/// [`BufferMetrics`].
///
/// # Capacity
///
/// Equal cursors mean "empty", so one slot per channel is never filled and
/// at most `buffer_size - 1` samples can be queued. Writes that do not fit
/// are rejected whole.
///
/// # Example
/// ```
/// use rtbuffer::RealtimeBufferManager;
///
/// let mut manager = RealtimeBufferManager::new(512, 2, 48000).unwrap();
/// assert!(manager.write(&[0.5; 480], 0).unwrap());
/// assert!((manager.latency_ms(0).unwrap() - 10.0).abs() < 1e-4);
///
/// let samples = manager.read(480, 0).unwrap();
/// assert_eq!(samples.len(), 480);
/// ```
pub struct RealtimeBufferManager {
    channels: Vec<RingBufferChannel>,
    buffer_size: usize,
    sample_rate: u32,
    metrics: Arc<BufferMetrics>,
    underrun_observers: ObserverSet<UnderrunEvent>,
    overrun_observers: ObserverSet<OverrunEvent>,
}

impl RealtimeBufferManager {
    /// Allocate `channel_count` zeroed channels of `buffer_size` samples each
    pub fn new(buffer_size: usize, channel_count: usize, sample_rate: u32) -> Result<Self> {
        let config = BufferConfig {
            buffer_size,
            channels: channel_count,
            sample_rate,
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &BufferConfig) -> Result<Self> {
        config.validate()?;

        let channels = (0..config.channels)
            .map(|_| RingBufferChannel::new(config.buffer_size))
            .collect();

        log::info!(
            "Buffer manager: {} channels x {} samples at {} Hz",
            config.channels,
            config.buffer_size,
            config.sample_rate
        );

        Ok(Self {
            channels,
            buffer_size: config.buffer_size,
            sample_rate: config.sample_rate,
            metrics: Arc::new(BufferMetrics::new()),
            underrun_observers: ObserverSet::new(),
            overrun_observers: ObserverSet::new(),
        })
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Shared handle to the overrun/underrun counters
    pub fn metrics(&self) -> Arc<BufferMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn underrun_count(&self) -> u64 {
        self.metrics.underrun_count()
    }

    pub fn overrun_count(&self) -> u64 {
        self.metrics.overrun_count()
    }

    fn channel(&self, channel: usize) -> Result<&RingBufferChannel> {
        let channel_count = self.channels.len();
        self.channels
            .get(channel)
            .ok_or(BufferError::InvalidChannel {
                channel,
                channel_count,
            })
    }

    /// Append `data` to a channel
    ///
    /// Returns `Ok(true)` if the whole block was queued. If the block does
    /// not fit in the free space, nothing is written, the overrun counter is
    /// incremented, overrun observers are notified, and `Ok(false)` is
    /// returned. The caller decides whether to drop or retry the block.
    pub fn write(&mut self, data: &[f32], channel: usize) -> Result<bool> {
        let channel_count = self.channels.len();
        let Some(ring) = self.channels.get_mut(channel) else {
            return Err(BufferError::InvalidChannel {
                channel,
                channel_count,
            });
        };

        if ring.would_overrun(data.len()) {
            log::trace!(
                "Overrun on channel {}: {} samples, {} free",
                channel,
                data.len(),
                ring.free()
            );
            self.metrics.record_overrun();
            self.overrun_observers.notify(&OverrunEvent {
                channel,
                excess_samples: data.len(),
            });
            return Ok(false);
        }

        ring.push(data);
        Ok(true)
    }

    /// Read up to `out.len()` samples from a channel into `out`
    ///
    /// Returns how many samples were copied. When fewer samples are queued
    /// than requested, this is an underrun: the counter is incremented,
    /// underrun observers receive the number of samples that were queued, and
    /// only those samples are copied. The rest of `out` is left as it was;
    /// padding is the caller's choice.
    ///
    /// On an invalid channel `out` is zero-filled and an error is returned.
    pub fn read_into(&mut self, out: &mut [f32], channel: usize) -> Result<usize> {
        let channel_count = self.channels.len();
        let Some(ring) = self.channels.get_mut(channel) else {
            out.fill(0.0);
            return Err(BufferError::InvalidChannel {
                channel,
                channel_count,
            });
        };

        let available = ring.available();
        if available < out.len() {
            log::trace!(
                "Underrun on channel {}: requested {}, available {}",
                channel,
                out.len(),
                available
            );
            self.metrics.record_underrun();
            self.underrun_observers.notify(&UnderrunEvent {
                channel,
                requested: out.len(),
                latency_samples: available,
            });
        }

        Ok(ring.pop(out))
    }

    /// Read up to `count` samples from a channel
    ///
    /// Same semantics as [`read_into`](Self::read_into); the returned vector
    /// is shorter than `count` after an underrun and is never padded.
    pub fn read(&mut self, count: usize, channel: usize) -> Result<Vec<f32>> {
        self.channel(channel)?;
        let mut out = vec![0.0; count];
        let read = self.read_into(&mut out, channel)?;
        out.truncate(read);
        Ok(out)
    }

    /// Samples written but not yet read
    pub fn available_samples(&self, channel: usize) -> Result<usize> {
        Ok(self.channel(channel)?.available())
    }

    /// Samples that can be written before the next write overruns
    pub fn free_samples(&self, channel: usize) -> Result<usize> {
        Ok(self.channel(channel)?.free())
    }

    /// Queued latency in samples; identical to [`available_samples`](Self::available_samples)
    pub fn latency_samples(&self, channel: usize) -> Result<usize> {
        self.available_samples(channel)
    }

    /// Queued latency in milliseconds at the configured sample rate
    pub fn latency_ms(&self, channel: usize) -> Result<f32> {
        let samples = self.latency_samples(channel)?;
        Ok(self.samples_to_ms(samples))
    }

    fn samples_to_ms(&self, samples: usize) -> f32 {
        samples as f32 / self.sample_rate as f32 * 1000.0
    }

    /// Change the capacity of every channel
    ///
    /// Targets outside `[512, 65536]` are rejected with a warning and leave
    /// the manager untouched. Otherwise each channel is reallocated, the
    /// first `min(old, new)` slots of its old storage are copied from index 0,
    /// and all cursors are reset.
    ///
    /// The copy does not follow the cursors, so data queued at the time of
    /// the call is no longer in playable order. Resize between sessions, with
    /// the audio callback stopped.
    pub fn resize(&mut self, new_size: usize) -> Result<()> {
        if !(MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&new_size) {
            log::warn!(
                "Ignoring resize to {} samples: must be within [{}, {}]",
                new_size,
                MIN_BUFFER_SIZE,
                MAX_BUFFER_SIZE
            );
            return Err(BufferError::InvalidResizeTarget {
                requested: new_size,
                min: MIN_BUFFER_SIZE,
                max: MAX_BUFFER_SIZE,
            });
        }

        for ring in &mut self.channels {
            ring.resize(new_size);
        }
        log::info!(
            "Resized buffers from {} to {} samples",
            self.buffer_size,
            new_size
        );
        self.buffer_size = new_size;
        Ok(())
    }

    /// Zero every read and write cursor; sample storage is not cleared
    pub fn reset(&mut self) {
        for ring in &mut self.channels {
            ring.reset();
        }
        log::debug!("Reset cursors on {} channels", self.channels.len());
    }

    /// Zero the overrun and underrun counters without touching buffers
    pub fn reset_error_counters(&self) {
        self.metrics.reset();
    }

    /// Per-channel status, in channel order
    pub fn buffer_status(&self) -> Vec<BufferStatus> {
        self.channels
            .iter()
            .enumerate()
            .map(|(channel, ring)| BufferStatus {
                channel,
                available_samples: ring.available(),
                latency_ms: self.samples_to_ms(ring.available()),
                write_cursor: ring.write_cursor(),
                read_cursor: ring.read_cursor(),
            })
            .collect()
    }

    /// Per-channel status together with the counters
    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            buffer_size: self.buffer_size,
            sample_rate: self.sample_rate,
            underruns: self.underrun_count(),
            overruns: self.overrun_count(),
            channels: self.buffer_status(),
        }
    }

    /// Register an underrun observer; registering the same handle twice is a no-op
    pub fn on_underrun(&mut self, observer: &UnderrunObserver) {
        self.underrun_observers.insert(observer);
    }

    /// Unregister an underrun observer; unknown handles are ignored
    pub fn off_underrun(&mut self, observer: &UnderrunObserver) {
        self.underrun_observers.remove(observer);
    }

    /// Register an overrun observer; registering the same handle twice is a no-op
    pub fn on_overrun(&mut self, observer: &OverrunObserver) {
        self.overrun_observers.insert(observer);
    }

    /// Unregister an overrun observer; unknown handles are ignored
    pub fn off_overrun(&mut self, observer: &OverrunObserver) {
        self.overrun_observers.remove(observer);
    }

    /// Release all storage and observers
    ///
    /// Consumes the manager, so no read or write can follow.
    pub fn dispose(mut self) {
        self.underrun_observers.clear();
        self.overrun_observers.clear();
        self.channels.clear();
        log::debug!("Buffer manager disposed");
    }
}
