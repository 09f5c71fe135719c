pub mod alloc;
mod poll;
mod runtime;

pub use poll::{POLL_COUNT, RANDOM_VALUE, Sampler};
pub use runtime::{ALLOC_GAUGES, PROCESS_GAUGES, RuntimeStats, SYSTEM_GAUGES};
