mod memory;

pub use memory::MemStorage;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point in time copy of both metric namespaces. This is also the
/// document shape written by [`Storage::dump`] and read by [`Storage::load`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(default)]
    pub counters: BTreeMap<String, i64>,
    #[serde(default)]
    pub gauges: BTreeMap<String, f64>,
}

impl MetricsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty() && self.gauges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counters.len() + self.gauges.len()
    }
}

/// Metric storage shared by the sampler, transmitter, request handlers
/// and the persistence manager.
///
/// Every call is atomic with respect to every other call on the same
/// store, there is no ordering promise across calls from different callers.
pub trait Storage: Send + Sync {
    /// Overwrites the gauge and returns the stored value
    fn record_gauge(&self, name: &str, value: f64) -> f64;

    /// Adds `delta` to the counter, starting from zero when absent,
    /// and returns the new total
    fn accumulate_counter(&self, name: &str, delta: i64) -> i64;

    /// Current gauge value, `None` when never written
    fn gauge(&self, name: &str) -> Option<f64>;

    /// Current counter total, `None` when never written
    fn counter(&self, name: &str) -> Option<i64>;

    /// Consistent copy of both namespaces, detached from the store
    fn snapshot(&self) -> MetricsSnapshot;

    /// Serialized export of the full state
    fn dump(&self) -> Result<Vec<u8>, anyhow::Error>;

    /// Replaces the full state with a previously dumped document.
    /// A document which fails to parse leaves the store untouched
    fn load(&self, state: &[u8]) -> Result<(), anyhow::Error>;
}
