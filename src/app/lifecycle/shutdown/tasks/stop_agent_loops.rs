use crate::app::lifecycle::context::AgentContext;
use crate::app::lifecycle::pipeline::AsyncTask;
use anyhow::Error;
use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{info, instrument, warn};

/// Signals the sampler and transmitter to stop and waits for both
pub struct StopAgentLoopsTask;

#[async_trait]
impl AsyncTask<AgentContext, Error> for StopAgentLoopsTask {
    #[instrument(skip_all, name = "stop_agent_loops_task")]
    async fn run(&self, context: &AgentContext) -> Result<(), Error> {
        context.cancel.cancel();

        let loops = std::mem::take(&mut *context.loops.lock());
        let count = loops.len();

        for result in join_all(loops).await {
            if let Err(e) = result {
                warn!("Agent loop ended abnormally: {}", e);
            }
        }

        info!(count, "Stopped agent loops");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::AgentConfigBuilder;
    use crate::app::lifecycle::pipeline::BlockingTask;
    use crate::app::lifecycle::startup::tasks::start_sampler::StartSamplerTask;
    use crate::app::lifecycle::startup::tasks::start_transmitter::StartTransmitterTask;
    use crate::core::sampler::POLL_COUNT;

    #[tokio::test]
    async fn test_loops_stop_on_shutdown() {
        let ctx = AgentContext::default();
        let config = AgentConfigBuilder::default()
            .address("127.0.0.1:1".to_string())
            .poll_interval(1)
            .report_interval(60)
            .build()
            .unwrap();
        ctx.config.set(config).unwrap();

        StartSamplerTask.run(&ctx).unwrap();
        StartTransmitterTask.run(&ctx).unwrap();
        assert_eq!(ctx.loops.lock().len(), 2);

        // the first sample is taken immediately
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        StopAgentLoopsTask.run(&ctx).await.unwrap();

        assert!(ctx.loops.lock().is_empty());
        assert!(ctx.store.counter(POLL_COUNT).unwrap_or_default() >= 1);
    }
}
