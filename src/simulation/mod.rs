mod schedule;

pub use schedule::{JitterConfig, Step, StepOutcome, jitter_schedule, replay};
