pub mod capture;
pub mod interleave;
pub mod source;

pub use capture::AudioCapture;
pub use interleave::{Deinterleaver, interleave};
pub use source::{AudioSource, DeviceSource, SyntheticSource};
