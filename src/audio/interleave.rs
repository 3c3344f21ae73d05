/// Splits interleaved frames `[c0, c1, .., cN, c0, c1, ..]` into per-channel
/// slices, reusing its scratch storage between calls
pub struct Deinterleaver {
    channels: Vec<Vec<f32>>,
}

impl Deinterleaver {
    pub fn new(channel_count: usize, frames: usize) -> Self {
        Self {
            channels: (0..channel_count)
                .map(|_| Vec::with_capacity(frames))
                .collect(),
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Split one interleaved block. A trailing partial frame is ignored.
    ///
    /// Only allocates when a block is longer than any seen before.
    pub fn split(&mut self, interleaved: &[f32]) -> &[Vec<f32>] {
        let count = self.channels.len();
        for channel in &mut self.channels {
            channel.clear();
        }
        if count == 0 {
            return &self.channels;
        }
        for frame in interleaved.chunks_exact(count) {
            for (channel, &sample) in self.channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        &self.channels
    }
}

/// Interleave equal-length channel slices into `out`
///
/// `out` must hold `channels.len() * frames` samples where `frames` is the
/// length of the shortest channel slice.
pub fn interleave(channels: &[Vec<f32>], out: &mut [f32]) {
    let count = channels.len();
    if count == 0 {
        return;
    }
    for (ch, samples) in channels.iter().enumerate() {
        for (frame, &sample) in samples.iter().enumerate() {
            if let Some(slot) = out.get_mut(frame * count + ch) {
                *slot = sample;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_stereo() {
        let mut split = Deinterleaver::new(2, 4);
        let channels = split.split(&[1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
        assert_eq!(channels[0], vec![1.0, 2.0, 3.0]);
        assert_eq!(channels[1], vec![-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_split_ignores_partial_frame() {
        let mut split = Deinterleaver::new(3, 2);
        let channels = split.split(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(channels[0], vec![1.0]);
        assert_eq!(channels[2], vec![3.0]);
    }

    #[test]
    fn test_split_reuses_buffers() {
        let mut split = Deinterleaver::new(1, 2);
        split.split(&[1.0, 2.0, 3.0]);
        let channels = split.split(&[4.0]);
        assert_eq!(channels[0], vec![4.0]);
    }

    #[test]
    fn test_interleave_roundtrip() {
        let channels = vec![vec![1.0, 2.0], vec![10.0, 20.0]];
        let mut out = [0.0; 4];
        interleave(&channels, &mut out);
        assert_eq!(out, [1.0, 10.0, 2.0, 20.0]);
    }
}
