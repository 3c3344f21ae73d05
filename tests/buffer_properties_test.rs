use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_abs_diff_eq;

use rtbuffer::buffer::{UnderrunEvent, UnderrunObserver};
use rtbuffer::{BufferError, RealtimeBufferManager};

fn ramp(len: usize, start: f32) -> Vec<f32> {
    (0..len).map(|i| start + i as f32).collect()
}

#[test]
fn test_wrap_preserves_fifo_order() {
    let buffer_size = 1024;
    for channels in [1, 2, 6] {
        let mut manager = RealtimeBufferManager::new(buffer_size, channels, 48000).unwrap();

        for ch in 0..channels {
            let base = ch as f32 * 10_000.0;
            let first = ramp(buffer_size / 2, base);
            let second = ramp(buffer_size / 2, base + (buffer_size / 2) as f32);

            assert!(manager.write(&first, ch).unwrap());
            let head = manager.read(buffer_size / 4, ch).unwrap();
            assert_eq!(head, &first[..buffer_size / 4]);

            // Crosses the end of storage
            assert!(manager.write(&second, ch).unwrap());

            let remaining = manager.available_samples(ch).unwrap();
            assert_eq!(remaining, buffer_size * 3 / 4);

            let rest = manager.read(remaining, ch).unwrap();
            let mut expected = first[buffer_size / 4..].to_vec();
            expected.extend_from_slice(&second);
            assert_eq!(rest, expected, "channel {} of {}", ch, channels);
        }

        assert_eq!(manager.underrun_count(), 0);
        assert_eq!(manager.overrun_count(), 0);
    }
}

#[test]
fn test_underrun_on_empty_buffer() {
    let mut manager = RealtimeBufferManager::new(8192, 2, 48000).unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let mut observers = Vec::new();
    for _ in 0..3 {
        let hits = Arc::clone(&hits);
        let observer: UnderrunObserver = Arc::new(move |e: &UnderrunEvent| {
            assert_eq!(e.latency_samples, 0);
            assert_eq!(e.requested, 100);
            hits.fetch_add(1, Ordering::SeqCst);
        });
        manager.on_underrun(&observer);
        observers.push(observer);
    }

    let samples = manager.read(100, 0).unwrap();
    assert!(samples.is_empty());
    assert_eq!(manager.underrun_count(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[test]
fn test_overrun_when_nearly_full() {
    let buffer_size = 4096;
    let mut manager = RealtimeBufferManager::new(buffer_size, 1, 48000).unwrap();
    assert!(manager.write(&vec![0.5; buffer_size - 1], 0).unwrap());
    assert_eq!(manager.available_samples(0).unwrap(), buffer_size - 1);

    assert!(!manager.write(&vec![0.5; buffer_size], 0).unwrap());
    assert_eq!(manager.overrun_count(), 1);
    assert_eq!(manager.available_samples(0).unwrap(), buffer_size - 1);

    // Even a single sample no longer fits
    assert!(!manager.write(&[0.5], 0).unwrap());
    assert_eq!(manager.overrun_count(), 2);
}

#[test]
fn test_resize_bounds() {
    let mut manager = RealtimeBufferManager::new(8192, 2, 48000).unwrap();
    manager.write(&[1.0; 300], 0).unwrap();
    manager.write(&[1.0; 200], 1).unwrap();
    manager.read(100, 1).unwrap();
    let before = manager.buffer_status();

    assert!(matches!(
        manager.resize(100),
        Err(BufferError::InvalidResizeTarget { requested: 100, .. })
    ));
    assert!(matches!(
        manager.resize(100_000),
        Err(BufferError::InvalidResizeTarget { .. })
    ));
    assert_eq!(manager.buffer_size(), 8192);
    assert_eq!(manager.buffer_status(), before);

    manager.resize(16384).unwrap();
    assert_eq!(manager.buffer_size(), 16384);
    for status in manager.buffer_status() {
        assert_eq!(status.write_cursor, 0);
        assert_eq!(status.read_cursor, 0);
        assert_eq!(status.available_samples, 0);
    }
    assert_eq!(manager.free_samples(0).unwrap(), 16383);
}

#[test]
fn test_resize_accepts_limits() {
    let mut manager = RealtimeBufferManager::new(8192, 1, 48000).unwrap();
    manager.resize(512).unwrap();
    assert_eq!(manager.buffer_size(), 512);
    manager.resize(65536).unwrap();
    assert_eq!(manager.buffer_size(), 65536);
}

#[test]
fn test_latency_conversion() {
    let mut manager = RealtimeBufferManager::new(8192, 2, 48000).unwrap();
    manager.write(&[0.0; 480], 1).unwrap();

    assert_eq!(manager.latency_samples(1).unwrap(), 480);
    assert_abs_diff_eq!(manager.latency_ms(1).unwrap(), 10.0, epsilon = 1e-4);
    assert_abs_diff_eq!(manager.latency_ms(0).unwrap(), 0.0);
}

#[test]
fn test_small_buffer_scenario() {
    let mut manager = RealtimeBufferManager::new(512, 2, 48000).unwrap();

    assert!(!manager.write(&ramp(600, 0.0), 0).unwrap());
    assert_eq!(manager.overrun_count(), 1);
    assert_eq!(manager.available_samples(0).unwrap(), 0);

    let data = ramp(500, 0.0);
    assert!(manager.write(&data, 0).unwrap());

    let out = manager.read(500, 0).unwrap();
    assert_eq!(out, data);
    assert_eq!(manager.available_samples(0).unwrap(), 0);
    assert_eq!(manager.underrun_count(), 0);
}

#[test]
fn test_status_does_not_mutate() {
    let mut manager = RealtimeBufferManager::new(1024, 2, 48000).unwrap();
    manager.write(&[0.1; 100], 0).unwrap();

    let first = manager.buffer_status();
    let second = manager.buffer_status();
    assert_eq!(first, second);
    assert_eq!(manager.available_samples(0).unwrap(), 100);
    assert_eq!(first[0].channel, 0);
    assert_eq!(first[1].channel, 1);
    assert_abs_diff_eq!(first[0].latency_ms, 100.0 / 48.0, epsilon = 1e-4);
}

#[test]
fn test_invalid_channel_queries() {
    let manager = RealtimeBufferManager::new(1024, 2, 48000).unwrap();
    assert!(matches!(
        manager.available_samples(2),
        Err(BufferError::InvalidChannel {
            channel: 2,
            channel_count: 2
        })
    ));
    assert!(manager.latency_ms(9).is_err());
}
