use crate::app::lifecycle::context::ServerContext;
use crate::app::lifecycle::pipeline::BlockingTask;
use anyhow::{Error, anyhow};
use tracing::info;

/// Starts the periodic saver when persistence is enabled with
/// a non-zero store interval
pub struct StartPersistenceTask;

impl BlockingTask<ServerContext, Error> for StartPersistenceTask {
    fn run(&self, ctx: &ServerContext) -> Result<(), Error> {
        let config = ctx
            .config
            .get()
            .ok_or_else(|| anyhow!("Config not loaded before persistence start"))?;

        let persistence = ctx
            .persistence
            .get()
            .ok_or_else(|| anyhow!("Store not initialized before persistence start"))?;

        let (Some(manager), Some(period)) = (persistence, config.save_period()) else {
            return Ok(());
        };

        let saver = manager.clone().spawn_saver(period, ctx.cancel.clone());
        *ctx.saver.lock() = Some(saver);

        info!(
            path = %manager.path().display(),
            period = ?period,
            "Started periodic metric saver"
        );

        Ok(())
    }
}
