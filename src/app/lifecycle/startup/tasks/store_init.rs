use crate::app::lifecycle::context::ServerContext;
use crate::app::lifecycle::pipeline::BlockingTask;
use crate::core::persistence::{PersistenceManager, SyncSaveStorage};
use crate::core::storage::{MemStorage, Storage};
use anyhow::{Error, anyhow};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Creates the server store, restoring the saved metrics first when
/// enabled. A 0 store interval wraps the store so every mutation is saved
pub struct StoreInitTask;

impl BlockingTask<ServerContext, Error> for StoreInitTask {
    #[instrument(skip_all, name = "store_init_task")]
    fn run(&self, ctx: &ServerContext) -> Result<(), Error> {
        let config = ctx
            .config
            .get()
            .ok_or_else(|| anyhow!("Config not loaded before store init"))?;

        let memory: Arc<dyn Storage> = Arc::new(MemStorage::new());

        let persistence = config
            .storage_path()
            .map(|path| Arc::new(PersistenceManager::new(memory.clone(), path)));

        match &persistence {
            Some(manager) if config.restore => match manager.restore() {
                Ok(count) => info!(
                    count,
                    path = %manager.path().display(),
                    "Restored metrics"
                ),
                Err(e) => warn!("Starting with an empty store: {:#}", e),
            },
            Some(manager) => info!(path = %manager.path().display(), "Restore disabled"),
            None => info!("No storage path configured, persistence disabled"),
        }

        let store: Arc<dyn Storage> = match (&persistence, config.save_period()) {
            (Some(manager), None) => Arc::new(SyncSaveStorage::new(memory, manager.clone())),
            _ => memory,
        };

        ctx.store
            .set(store)
            .map_err(|_| anyhow!("Store already initialized"))?;
        ctx.persistence
            .set(persistence)
            .map_err(|_| anyhow!("Persistence already initialized"))?;

        Ok(())
    }
}
