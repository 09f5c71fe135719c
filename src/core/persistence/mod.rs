mod synced;

pub use synced::SyncSaveStorage;

use crate::core::storage::Storage;
use anyhow::{Context, Error};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Bridges a [`Storage`] to a json file on disk.
///
/// Restore happens once before traffic is served, saves happen on a timer,
/// after every mutation when wrapped by [`SyncSaveStorage`], and once more
/// on shutdown. Saves always go through [`Storage::dump`] and restores
/// through [`Storage::load`].
pub struct PersistenceManager {
    store: Arc<dyn Storage>,
    path: PathBuf,
    /// Held across dump and write so the newest dump is always the last one written
    write_lock: Mutex<()>,
}

impl PersistenceManager {
    pub fn new(store: Arc<dyn Storage>, path: PathBuf) -> Self {
        PersistenceManager {
            store,
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted document into the store, returning
    /// the number of restored metrics
    pub fn restore(&self) -> Result<usize, Error> {
        let state = std::fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;

        self.store
            .load(&state)
            .with_context(|| format!("failed to restore from {}", self.path.display()))?;

        Ok(self.store.snapshot().len())
    }

    /// Dumps the store and overwrites the persisted document. The dump is
    /// written beside the target first and renamed over it, so a reader
    /// never observes a partially written file
    pub fn save(&self) -> Result<(), Error> {
        let _guard = self.write_lock.lock();

        let state = self.store.dump()?;

        if let Some(directory) = self.path.parent() {
            if !directory.as_os_str().is_empty() {
                std::fs::create_dir_all(directory).with_context(|| {
                    format!("failed to create storage directory {}", directory.display())
                })?;
            }
        }

        let staging = self.staging_path();
        std::fs::write(&staging, &state)
            .with_context(|| format!("failed to write {}", staging.display()))?;
        std::fs::rename(&staging, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        debug!("Saved {} bytes of metrics to {}", state.len(), self.path.display());

        Ok(())
    }

    /// Saves and logs the failure, if any. Save errors never
    /// propagate beyond the persistence boundary
    pub fn save_or_log(&self) {
        if let Err(e) = self.save() {
            error!("Failed to save metrics: {:#}", e);
        }
    }

    /// Starts the periodic saver, which runs until `cancel` fires
    pub fn spawn_saver(self: Arc<Self>, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // first tick completes immediately, nothing worth saving yet
            ticker.tick().await;

            info!("Saving metrics to {} every {:?}", self.path.display(), period);

            loop {
                select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let manager = self.clone();
                        if let Err(e) = tokio::task::spawn_blocking(move || manager.save_or_log()).await {
                            error!("Metrics save task failed: {}", e);
                        }
                    }
                }
            }

            debug!("Periodic metrics saver stopped");
        })
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging: OsString = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}
