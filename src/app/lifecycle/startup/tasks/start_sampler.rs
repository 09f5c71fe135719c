use crate::app::lifecycle::context::AgentContext;
use crate::app::lifecycle::pipeline::BlockingTask;
use crate::core::sampler::Sampler;
use anyhow::{Error, anyhow};
use tracing::info;

pub struct StartSamplerTask;

impl BlockingTask<AgentContext, Error> for StartSamplerTask {
    fn run(&self, ctx: &AgentContext) -> Result<(), Error> {
        let config = ctx
            .config
            .get()
            .ok_or_else(|| anyhow!("Config not loaded before sampler start"))?;

        let handle = Sampler::new(ctx.store.clone()).spawn(config.poll_period(), ctx.cancel.clone());
        ctx.loops.lock().push(handle);

        info!(period = ?config.poll_period(), "Started runtime sampler");

        Ok(())
    }
}
