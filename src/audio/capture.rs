use crate::config::{AudioConfig, BufferConfig};
use crate::error::{BufferError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Sender, TrySendError};

/// Input stream on the default capture device
///
/// The cpal callback never touches the buffer manager. It forwards each
/// interleaved block to the processing thread, which owns the manager.
pub struct AudioCapture {
    stream: cpal::Stream,
}

impl AudioCapture {
    pub fn new(buffer: &BufferConfig, audio: &AudioConfig, tx: Sender<Vec<f32>>) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| BufferError::AudioDevice("No input device found".into()))?;

        match device.description() {
            Ok(desc) => log::info!("Input device: {:?}", desc),
            Err(_) => log::info!("Input device: Unknown"),
        }

        let channels = u16::try_from(buffer.channels).map_err(|_| {
            BufferError::Config(format!("{} channels not supported", buffer.channels))
        })?;

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: buffer.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(audio.block_size as u32),
        };

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Never block the driver; a full queue drops the block
                    match tx.try_send(data.to_vec()) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => log::trace!("Capture queue full"),
                        Err(TrySendError::Disconnected(_)) => log::warn!("Audio receiver dropped"),
                    }
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| BufferError::AudioStream(format!("{}", e)))?;

        stream
            .play()
            .map_err(|e| BufferError::AudioStream(format!("{}", e)))?;

        Ok(Self { stream })
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        let _ = self.stream.pause();
    }
}
