use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, TrySendError};

use crate::audio::{AudioSource, Deinterleaver, interleave};
use crate::buffer::{RealtimeBufferManager, StatusReport};
use crate::config::AudioConfig;
use crate::error::{BufferError, Result};

/// Outcome of pushing one interleaved block into the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushResult {
    pub frames: usize,
    pub accepted_channels: usize,
    pub rejected_channels: usize,
}

/// Single-threaded owner of a [`RealtimeBufferManager`]
///
/// Producers on other threads hand interleaved blocks in through
/// [`AudioSource`]; this pipeline deinterleaves them into per-channel writes
/// and drains fixed-size consumer blocks back out. Because only this
/// pipeline touches the manager, each channel sees exactly one writer and
/// one reader without any locking.
pub struct BufferPipeline {
    manager: RealtimeBufferManager,
    deinterleaver: Deinterleaver,
    consumer_block: usize,
    scratch: Vec<Vec<f32>>,
    output: Vec<f32>,
    pending_frames: usize,
}

impl BufferPipeline {
    pub fn new(manager: RealtimeBufferManager, audio: &AudioConfig) -> Result<Self> {
        audio.validate()?;
        let channels = manager.channel_count();
        Ok(Self {
            deinterleaver: Deinterleaver::new(channels, audio.block_size),
            consumer_block: audio.consumer_block,
            scratch: vec![vec![0.0; audio.consumer_block]; channels],
            output: vec![0.0; audio.consumer_block * channels],
            pending_frames: 0,
            manager,
        })
    }

    pub fn manager(&self) -> &RealtimeBufferManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut RealtimeBufferManager {
        &mut self.manager
    }

    pub fn into_manager(self) -> RealtimeBufferManager {
        self.manager
    }

    /// Write one interleaved block, channel by channel
    ///
    /// A channel that would overrun drops its part of the block; the other
    /// channels are still written.
    pub fn push_block(&mut self, interleaved: &[f32]) -> Result<PushResult> {
        let channels = self.deinterleaver.split(interleaved);
        let mut result = PushResult {
            frames: channels.first().map_or(0, Vec::len),
            ..PushResult::default()
        };

        for (channel, samples) in channels.iter().enumerate() {
            if self.manager.write(samples, channel)? {
                result.accepted_channels += 1;
            } else {
                result.rejected_channels += 1;
            }
        }
        Ok(result)
    }

    /// Read one consumer block from every channel, interleaved
    ///
    /// Shortfalls after an underrun are padded with silence.
    pub fn pull_block(&mut self) -> Result<&[f32]> {
        for (channel, out) in self.scratch.iter_mut().enumerate() {
            let read = self.manager.read_into(out, channel)?;
            out[read..].fill(0.0);
        }
        interleave(&self.scratch, &mut self.output);
        Ok(&self.output)
    }

    /// Push a block, then pull as many consumer blocks as its frames cover
    ///
    /// Models a consumer running at the same sample rate as the producer
    /// but with its own block size. Returns the number of blocks pulled.
    pub fn process(&mut self, interleaved: &[f32]) -> Result<usize> {
        let pushed = self.push_block(interleaved)?;
        self.pending_frames += pushed.frames;

        let mut pulled = 0;
        while self.pending_frames >= self.consumer_block {
            self.pull_block()?;
            self.pending_frames -= self.consumer_block;
            pulled += 1;
        }
        Ok(pulled)
    }

    /// Drive the pipeline from `source` until it is exhausted
    ///
    /// Sends a status report on `status_tx` every `status_interval` and
    /// returns the final report.
    pub fn run(
        &mut self,
        source: &mut dyn AudioSource,
        status_tx: Option<&Sender<StatusReport>>,
        status_interval: Duration,
    ) -> anyhow::Result<StatusReport> {
        if source.channels() != self.manager.channel_count() {
            return Err(BufferError::Config(format!(
                "source has {} channels, manager has {}",
                source.channels(),
                self.manager.channel_count()
            ))
            .into());
        }

        let _rt_handle = match audio_thread_priority::promote_current_thread_to_real_time(
            self.consumer_block as u32,
            self.manager.sample_rate(),
        ) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("Could not set real-time priority: {}", e);
                None
            }
        };

        let mut last_status = Instant::now();

        while let Some(block) = source.next_buffer()? {
            self.process(&block)?;

            if let Some(tx) = status_tx
                && last_status.elapsed() >= status_interval
            {
                match tx.try_send(self.manager.status_report()) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Disconnected(_)) => {
                        log::debug!("Status receiver dropped");
                    }
                }
                last_status = Instant::now();
            }
        }

        log::info!(
            "Source exhausted: {} overruns, {} underruns",
            self.manager.overrun_count(),
            self.manager.underrun_count()
        );
        Ok(self.manager.status_report())
    }
}
