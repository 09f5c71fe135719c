pub mod tasks;

use crate::app::lifecycle::context::{AgentContext, ServerContext};
use crate::app::lifecycle::pipeline::{Pipeline, PipelineBuilder};
use crate::app::span::WrappedPipelineTask;
use anyhow::{Error, anyhow};
use tasks::flush_store::FlushStoreTask;
use tasks::observability::ObservabilityShutdownTask;
use tasks::stop_agent_loops::StopAgentLoopsTask;
use tasks::stop_server::StopServerTask;
use tracing::info_span;

/// Stops accepting requests before the final save so that no
/// acknowledged update is missing from the file
pub fn build_server_shutdown_pipeline() -> Result<Pipeline<ServerContext, Error>, Error> {
    let shutdown_pipeline = PipelineBuilder::new()
        .with_async(Box::new(StopServerTask))
        .with_async(Box::new(FlushStoreTask))
        .build()
        .ok_or_else(|| anyhow!("Shutdown pipeline should have tasks!"))?;

    let observed_pipeline =
        WrappedPipelineTask::new(shutdown_pipeline, || info_span!("shutdown_pipeline"));

    PipelineBuilder::new()
        .with_async(Box::new(observed_pipeline))
        .with_blocking(Box::new(ObservabilityShutdownTask))
        .build()
        .ok_or_else(|| anyhow!("Shutdown pipeline should have tasks!"))
}

pub fn build_agent_shutdown_pipeline() -> Result<Pipeline<AgentContext, Error>, Error> {
    let shutdown_pipeline = PipelineBuilder::new()
        .with_async(Box::new(StopAgentLoopsTask))
        .build()
        .ok_or_else(|| anyhow!("Shutdown pipeline should have tasks!"))?;

    let observed_pipeline =
        WrappedPipelineTask::new(shutdown_pipeline, || info_span!("shutdown_pipeline"));

    PipelineBuilder::new()
        .with_async(Box::new(observed_pipeline))
        .with_blocking(Box::new(ObservabilityShutdownTask))
        .build()
        .ok_or_else(|| anyhow!("Shutdown pipeline should have tasks!"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::ServerConfigBuilder;

    #[tokio::test]
    async fn test_shutdown_without_startup() {
        let ctx = ServerContext::default();
        ctx.config
            .set(
                ServerConfigBuilder::default()
                    .file_storage_path(String::new())
                    .build()
                    .unwrap(),
            )
            .unwrap();

        build_server_shutdown_pipeline().unwrap().run(&ctx).await.unwrap();

        assert!(ctx.cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_agent_shutdown_without_loops() {
        let ctx = AgentContext::default();

        build_agent_shutdown_pipeline().unwrap().run(&ctx).await.unwrap();

        assert!(ctx.cancel.is_cancelled());
    }
}
