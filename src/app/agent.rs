use crate::app::cli::parse_agent_args;
use crate::app::lifecycle::context::AgentContext;
use crate::app::lifecycle::shutdown::build_agent_shutdown_pipeline;
use crate::app::lifecycle::startup::build_agent_start_pipeline;
use crate::app::signal::wait_for_shutdown;
use anyhow::{Context, Error};
use tracing::info;

/// Samples and reports until interrupted
pub async fn run() -> Result<(), Error> {
    let startup_pipeline = build_agent_start_pipeline(parse_agent_args())?;
    let shutdown_pipeline = build_agent_shutdown_pipeline()?;
    let ctx = AgentContext::default();

    startup_pipeline
        .run(&ctx)
        .await
        .context("Agent startup failed")?;
    info!("Startup successful");

    wait_for_shutdown().await?;
    info!("Shutdown signal received");

    shutdown_pipeline
        .run(&ctx)
        .await
        .context("Clean shutdown failed")
}
