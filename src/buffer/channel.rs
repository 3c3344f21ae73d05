/// Fixed-capacity circular sample buffer for a single audio channel
///
/// Read and write cursors advance independently and wrap at `capacity()`.
/// A channel is empty when both cursors are equal. Because that same test
/// would also describe a completely full buffer, one slot is never written:
/// at most `capacity() - 1` samples can be queued at any time.
///
/// The channel itself knows nothing about overrun/underrun accounting; the
/// manager decides whether a transfer is allowed and updates the counters.
pub struct RingBufferChannel {
    storage: Vec<f32>,
    write_cursor: usize,
    read_cursor: usize,
}

impl RingBufferChannel {
    /// Allocate a zeroed channel holding `capacity` slots (must be non-zero)
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: vec![0.0; capacity],
            write_cursor: 0,
            read_cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    /// Number of written but unread samples
    pub fn available(&self) -> usize {
        if self.write_cursor >= self.read_cursor {
            self.write_cursor - self.read_cursor
        } else {
            self.capacity() - self.read_cursor + self.write_cursor
        }
    }

    /// Number of samples that can be written without touching unread data
    pub fn free(&self) -> usize {
        self.capacity().saturating_sub(1) - self.available()
    }

    /// Whether writing `len` samples would overwrite unread data
    ///
    /// Equivalent to the next write cursor landing on the read cursor, or
    /// stepping over it while the writer is behind the reader.
    pub fn would_overrun(&self, len: usize) -> bool {
        len > self.free()
    }

    /// Copy `data` in at the write cursor, wrapping around the end of storage
    ///
    /// The caller must have checked `would_overrun` first.
    pub(crate) fn push(&mut self, data: &[f32]) {
        let capacity = self.capacity();
        debug_assert!(data.len() <= self.free());

        let tail = (capacity - self.write_cursor).min(data.len());
        let (first, second) = data.split_at(tail);
        self.storage[self.write_cursor..self.write_cursor + tail].copy_from_slice(first);
        self.storage[..second.len()].copy_from_slice(second);

        self.write_cursor = (self.write_cursor + data.len()) % capacity;
    }

    /// Copy up to `out.len()` queued samples into `out`, oldest first
    ///
    /// Returns the number of samples copied; the rest of `out` is untouched.
    pub(crate) fn pop(&mut self, out: &mut [f32]) -> usize {
        let capacity = self.capacity();
        let count = out.len().min(self.available());

        let tail = (capacity - self.read_cursor).min(count);
        out[..tail].copy_from_slice(&self.storage[self.read_cursor..self.read_cursor + tail]);
        out[tail..count].copy_from_slice(&self.storage[..count - tail]);

        self.read_cursor = (self.read_cursor + count) % capacity;
        count
    }

    /// Zero both cursors; stored samples are left in place
    pub(crate) fn reset(&mut self) {
        self.write_cursor = 0;
        self.read_cursor = 0;
    }

    /// Reallocate to `new_capacity`, keeping the first `min(old, new)` slots
    ///
    /// The copy starts at storage index 0 and ignores the cursors, so any
    /// queued data loses its ordering. Cursors are reset afterwards.
    pub(crate) fn resize(&mut self, new_capacity: usize) {
        let mut storage = vec![0.0; new_capacity];
        let keep = self.storage.len().min(new_capacity);
        storage[..keep].copy_from_slice(&self.storage[..keep]);
        self.storage = storage;
        self.reset();
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &[f32] {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_channel_is_empty() {
        let channel = RingBufferChannel::new(8);
        assert_eq!(channel.available(), 0);
        assert_eq!(channel.free(), 7);
        assert_eq!(channel.capacity(), 8);
    }

    #[test]
    fn test_one_slot_is_reserved() {
        let mut channel = RingBufferChannel::new(8);
        assert!(!channel.would_overrun(7));
        assert!(channel.would_overrun(8));

        channel.push(&[1.0; 7]);
        assert_eq!(channel.available(), 7);
        assert!(channel.would_overrun(1));
    }

    #[test]
    fn test_push_pop_wraps_in_order() {
        let mut channel = RingBufferChannel::new(8);
        channel.push(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let mut out = [0.0; 4];
        assert_eq!(channel.pop(&mut out), 4);
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0]);

        // Crosses the end of storage: tail segment then head segment
        channel.push(&[7.0, 8.0, 9.0, 10.0]);
        assert_eq!(channel.write_cursor(), 2);

        let mut out = [0.0; 6];
        assert_eq!(channel.pop(&mut out), 6);
        assert_eq!(out, [5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(channel.available(), 0);
        assert_eq!(channel.read_cursor(), 2);
    }

    #[test]
    fn test_pop_short_leaves_rest_of_output_untouched() {
        let mut channel = RingBufferChannel::new(8);
        channel.push(&[1.0, 2.0]);

        let mut out = [-1.0; 4];
        assert_eq!(channel.pop(&mut out), 2);
        assert_eq!(out, [1.0, 2.0, -1.0, -1.0]);
    }

    #[test]
    fn test_available_when_writer_behind_reader() {
        let mut channel = RingBufferChannel::new(8);
        channel.push(&[0.0; 6]);
        let mut out = [0.0; 5];
        channel.pop(&mut out);
        channel.push(&[0.0; 4]);

        // write = 2, read = 5
        assert_eq!(channel.write_cursor(), 2);
        assert_eq!(channel.read_cursor(), 5);
        assert_eq!(channel.available(), 5);
        assert_eq!(channel.free(), 2);
        assert!(channel.would_overrun(3));
    }

    #[test]
    fn test_resize_copies_from_offset_zero_and_resets_cursors() {
        let mut channel = RingBufferChannel::new(4);
        channel.push(&[1.0, 2.0, 3.0]);

        channel.resize(6);
        assert_eq!(channel.capacity(), 6);
        assert_eq!(channel.available(), 0);
        assert_eq!(channel.storage(), &[1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);

        channel.resize(2);
        assert_eq!(channel.storage(), &[1.0, 2.0]);
    }

    #[test]
    fn test_reset_keeps_storage() {
        let mut channel = RingBufferChannel::new(4);
        channel.push(&[1.0, 2.0]);
        channel.reset();
        assert_eq!(channel.available(), 0);
        assert_eq!(channel.storage(), &[1.0, 2.0, 0.0, 0.0]);
    }
}
