pub mod channel;
pub mod manager;
pub mod metrics;
pub mod observer;
pub mod status;

pub use channel::RingBufferChannel;
pub use manager::RealtimeBufferManager;
pub use metrics::BufferMetrics;
pub use observer::{ObserverSet, OverrunEvent, OverrunObserver, UnderrunEvent, UnderrunObserver};
pub use status::{BufferStatus, StatusReport};
