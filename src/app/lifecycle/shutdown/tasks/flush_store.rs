use crate::app::lifecycle::context::ServerContext;
use crate::app::lifecycle::pipeline::AsyncTask;
use anyhow::Error;
use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

/// Stops the periodic saver then writes the store out one last time
pub struct FlushStoreTask;

#[async_trait]
impl AsyncTask<ServerContext, Error> for FlushStoreTask {
    #[instrument(skip_all, name = "flush_store_task")]
    async fn run(&self, context: &ServerContext) -> Result<(), Error> {
        context.cancel.cancel();

        let saver = context.saver.lock().take();
        if let Some(saver) = saver {
            if let Err(e) = saver.await {
                warn!("Periodic saver ended abnormally: {}", e);
            }
        }

        let Some(Some(manager)) = context.persistence.get() else {
            info!("Persistence disabled, nothing to flush");
            return Ok(());
        };

        let manager = manager.clone();
        match tokio::task::spawn_blocking(move || manager.save()).await {
            Ok(Ok(())) => info!("Flushed metrics to disk"),
            Ok(Err(e)) => error!("Final metric save failed: {:#}", e),
            Err(e) => error!("Final metric save panicked: {}", e),
        }

        Ok(())
    }
}
