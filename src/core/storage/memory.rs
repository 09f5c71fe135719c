use crate::core::storage::{MetricsSnapshot, Storage};
use anyhow::Context;
use parking_lot::Mutex;

/// In memory store, both namespaces behind a single lock. Contention is
/// low (few names, infrequent writes) so nothing finer grained is needed
#[derive(Default)]
pub struct MemStorage {
    data: Mutex<MetricsSnapshot>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemStorage {
    fn record_gauge(&self, name: &str, value: f64) -> f64 {
        self.data.lock().gauges.insert(name.to_owned(), value);
        value
    }

    fn accumulate_counter(&self, name: &str, delta: i64) -> i64 {
        let mut data = self.data.lock();

        let total = data.counters.entry(name.to_owned()).or_insert(0);
        *total = total.saturating_add(delta);
        *total
    }

    fn gauge(&self, name: &str) -> Option<f64> {
        self.data.lock().gauges.get(name).copied()
    }

    fn counter(&self, name: &str) -> Option<i64> {
        self.data.lock().counters.get(name).copied()
    }

    fn snapshot(&self) -> MetricsSnapshot {
        self.data.lock().clone()
    }

    fn dump(&self) -> Result<Vec<u8>, anyhow::Error> {
        let data = self.data.lock();

        serde_json::to_vec_pretty(&*data).context("failed to serialize metrics state")
    }

    fn load(&self, state: &[u8]) -> Result<(), anyhow::Error> {
        let restored: MetricsSnapshot =
            serde_json::from_slice(state).context("failed to deserialize metrics state")?;

        *self.data.lock() = restored;

        Ok(())
    }
}
