use crate::app::lifecycle::context::ServerContext;
use crate::app::lifecycle::pipeline::AsyncTask;
use anyhow::Error;
use async_trait::async_trait;
use tracing::{info, instrument};

pub struct StopServerTask;

#[async_trait]
impl AsyncTask<ServerContext, Error> for StopServerTask {
    #[instrument(skip_all, name = "server_shutdown_task")]
    async fn run(&self, context: &ServerContext) -> Result<(), Error> {
        match context.server.get() {
            Some(server) => {
                info!("Closing listener gracefully..");
                server.stop(true).await;
                info!("Listener closed");
            }
            None => {
                info!("Skipping listener shutdown, was never started");
            }
        }

        Ok(())
    }
}
