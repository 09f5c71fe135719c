use crate::app::lifecycle::context::AgentContext;
use crate::app::lifecycle::pipeline::BlockingTask;
use crate::core::transmit::{MetricClient, Transmitter};
use anyhow::{Error, anyhow};
use std::sync::Arc;
use tracing::info;

pub struct StartTransmitterTask;

impl BlockingTask<AgentContext, Error> for StartTransmitterTask {
    fn run(&self, ctx: &AgentContext) -> Result<(), Error> {
        let config = ctx
            .config
            .get()
            .ok_or_else(|| anyhow!("Config not loaded before transmitter start"))?;

        let client = MetricClient::new(&config.address, config.compress)?;
        let update_url = client.update_url().to_string();

        let transmitter = Arc::new(Transmitter::new(ctx.store.clone(), client));
        let handle = transmitter.spawn(config.report_period(), ctx.cancel.clone());
        ctx.loops.lock().push(handle);

        info!(
            url = %update_url,
            period = ?config.report_period(),
            gzip = config.compress,
            "Started metric transmitter"
        );

        Ok(())
    }
}
