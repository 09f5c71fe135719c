use crate::core::sampler::RuntimeStats;
use crate::core::storage::Storage;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Counter incremented once per poll
pub const POLL_COUNT: &str = "PollCount";
/// Gauge holding a fresh random number in `[0, 1)` every poll
pub const RANDOM_VALUE: &str = "RandomValue";

/// Periodically writes runtime statistics into a store
pub struct Sampler {
    store: Arc<dyn Storage>,
    runtime: RuntimeStats,
}

impl Sampler {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Sampler {
            store,
            runtime: RuntimeStats::new(),
        }
    }

    /// Captures one batch of samples. Individual writes may interleave
    /// with a concurrent snapshot, the batch is not atomic as a whole
    pub fn sample_once(&mut self) {
        for (name, value) in self.runtime.collect() {
            if value.is_finite() {
                self.store.record_gauge(name, value);
            } else {
                debug!("Skipping non finite sample {}={}", name, value);
            }
        }

        self.store.accumulate_counter(POLL_COUNT, 1);
        self.store.record_gauge(RANDOM_VALUE, rand::random::<f64>());
    }

    /// Polls immediately and then every `period` until `cancel` fires.
    /// A poll in progress always completes before the loop exits
    pub fn spawn(mut self, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!("Sampling runtime metrics every {:?}", period);

            loop {
                select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => self.sample_once(),
                }
            }

            debug!("Sampler stopped");
        })
    }
}
