pub mod tasks;

use crate::app::cli::{AgentArgs, ServerArgs};
use crate::app::lifecycle::context::{AgentContext, ServerContext};
use crate::app::lifecycle::pipeline::{Pipeline, PipelineBuilder};
use crate::app::span::WrappedPipelineTask;
use anyhow::{Error, anyhow};
use tasks::config_load::{AgentConfigLoadTask, ServerConfigLoadTask};
use tasks::observability::ConfigureObservabilityTask;
use tasks::start_persistence::StartPersistenceTask;
use tasks::start_sampler::StartSamplerTask;
use tasks::start_server::StartServerTask;
use tasks::start_transmitter::StartTransmitterTask;
use tasks::store_init::StoreInitTask;
use tracing::info_span;

/// Config, logging, store restore, periodic saver and finally the listener
pub fn build_server_start_pipeline(args: ServerArgs) -> Result<Pipeline<ServerContext, Error>, Error> {
    let serving = PipelineBuilder::new()
        .with_blocking(Box::new(StoreInitTask))
        .with_blocking(Box::new(StartPersistenceTask))
        .with_async(Box::new(StartServerTask))
        .build()
        .ok_or_else(|| anyhow!("Server startup pipeline should have tasks!"))?;

    PipelineBuilder::new()
        .with_blocking(Box::new(ServerConfigLoadTask::new(args)))
        .with_blocking(Box::new(ConfigureObservabilityTask))
        .with_async(Box::new(WrappedPipelineTask::new(serving, || {
            info_span!("startup_pipeline")
        })))
        .build()
        .ok_or_else(|| anyhow!("Server startup pipeline should have tasks!"))
}

pub fn build_agent_start_pipeline(args: AgentArgs) -> Result<Pipeline<AgentContext, Error>, Error> {
    let loops = PipelineBuilder::new()
        .with_blocking(Box::new(StartSamplerTask))
        .with_blocking(Box::new(StartTransmitterTask))
        .build()
        .ok_or_else(|| anyhow!("Agent startup pipeline should have tasks!"))?;

    PipelineBuilder::new()
        .with_blocking(Box::new(AgentConfigLoadTask::new(args)))
        .with_blocking(Box::new(ConfigureObservabilityTask))
        .with_async(Box::new(WrappedPipelineTask::new(loops, || {
            info_span!("startup_pipeline")
        })))
        .build()
        .ok_or_else(|| anyhow!("Agent startup pipeline should have tasks!"))
}
