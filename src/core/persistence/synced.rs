use crate::core::persistence::PersistenceManager;
use crate::core::storage::{MetricsSnapshot, Storage};
use anyhow::Error;
use std::sync::Arc;

/// Storage decorator for a zero save interval: every mutation is
/// followed by a save before the caller gets its result back.
///
/// The manager must be built over the same `inner` store so that
/// it dumps the state this decorator mutates.
pub struct SyncSaveStorage {
    inner: Arc<dyn Storage>,
    persistence: Arc<PersistenceManager>,
}

impl SyncSaveStorage {
    pub fn new(inner: Arc<dyn Storage>, persistence: Arc<PersistenceManager>) -> Self {
        SyncSaveStorage { inner, persistence }
    }
}

impl Storage for SyncSaveStorage {
    fn record_gauge(&self, name: &str, value: f64) -> f64 {
        let stored = self.inner.record_gauge(name, value);
        self.persistence.save_or_log();
        stored
    }

    fn accumulate_counter(&self, name: &str, delta: i64) -> i64 {
        let total = self.inner.accumulate_counter(name, delta);
        self.persistence.save_or_log();
        total
    }

    fn gauge(&self, name: &str) -> Option<f64> {
        self.inner.gauge(name)
    }

    fn counter(&self, name: &str) -> Option<i64> {
        self.inner.counter(name)
    }

    fn snapshot(&self) -> MetricsSnapshot {
        self.inner.snapshot()
    }

    fn dump(&self) -> Result<Vec<u8>, Error> {
        self.inner.dump()
    }

    fn load(&self, state: &[u8]) -> Result<(), Error> {
        self.inner.load(state)
    }
}
