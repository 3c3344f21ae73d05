use std::f32::consts::PI;
use std::time::Duration;

use crossbeam_channel::Receiver;

use super::AudioCapture;
use crate::config::{AudioConfig, BufferConfig};

/// Producer side of the pipeline: yields interleaved blocks until exhausted
pub trait AudioSource: Send {
    fn next_buffer(&mut self) -> anyhow::Result<Option<Vec<f32>>>;
    fn sample_rate(&self) -> u32;
    fn channels(&self) -> usize;
}

pub struct DeviceSource {
    rx: Receiver<Vec<f32>>,
    sample_rate: u32,
    channels: usize,
    _capture: AudioCapture,
}

impl DeviceSource {
    pub fn new(buffer: &BufferConfig, audio: &AudioConfig) -> anyhow::Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded(10);
        let capture = AudioCapture::new(buffer, audio, tx)?;
        Ok(Self {
            rx,
            sample_rate: buffer.sample_rate,
            channels: buffer.channels,
            _capture: capture,
        })
    }
}

impl AudioSource for DeviceSource {
    fn next_buffer(&mut self) -> anyhow::Result<Option<Vec<f32>>> {
        match self.rx.recv() {
            Ok(data) => Ok(Some(data)),
            Err(_) => Ok(None),
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> usize {
        self.channels
    }
}

/// Sine tone generator, channel `n` at `base_hz * (n + 1)`
///
/// With `paced` set, each block sleeps for its own duration so the source
/// behaves like a device callback.
pub struct SyntheticSource {
    sample_rate: u32,
    channels: usize,
    block_size: usize,
    base_hz: f32,
    amplitude: f32,
    position: usize,
    total_frames: Option<usize>,
    paced: bool,
}

impl SyntheticSource {
    pub fn new(buffer: &BufferConfig, audio: &AudioConfig) -> Self {
        Self {
            sample_rate: buffer.sample_rate,
            channels: buffer.channels,
            block_size: audio.block_size,
            base_hz: 220.0,
            amplitude: 0.5,
            position: 0,
            total_frames: None,
            paced: false,
        }
    }

    /// Stop after `secs` seconds of audio
    pub fn with_duration(mut self, secs: f32) -> Self {
        self.total_frames = Some((secs * self.sample_rate as f32) as usize);
        self
    }

    pub fn with_base_frequency(mut self, hz: f32) -> Self {
        self.base_hz = hz;
        self
    }

    pub fn paced(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    fn sample(&self, frame: usize, channel: usize) -> f32 {
        let t = frame as f32 / self.sample_rate as f32;
        let hz = self.base_hz * (channel + 1) as f32;
        self.amplitude * (2.0 * PI * hz * t).sin()
    }
}

impl AudioSource for SyntheticSource {
    fn next_buffer(&mut self) -> anyhow::Result<Option<Vec<f32>>> {
        let frames = match self.total_frames {
            Some(total) if self.position >= total => return Ok(None),
            Some(total) => self.block_size.min(total - self.position),
            None => self.block_size,
        };

        let mut block = Vec::with_capacity(frames * self.channels);
        for frame in self.position..self.position + frames {
            for channel in 0..self.channels {
                block.push(self.sample(frame, channel));
            }
        }
        self.position += frames;

        if self.paced {
            std::thread::sleep(Duration::from_secs_f32(
                frames as f32 / self.sample_rate as f32,
            ));
        }

        Ok(Some(block))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> usize {
        self.channels
    }
}
