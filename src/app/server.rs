use crate::app::cli::parse_server_args;
use crate::app::lifecycle::context::ServerContext;
use crate::app::lifecycle::shutdown::build_server_shutdown_pipeline;
use crate::app::lifecycle::startup::build_server_start_pipeline;
use crate::app::signal::wait_for_shutdown;
use anyhow::{Context, Error};
use tracing::info;

/// Serves until interrupted, then stops the listener, saves the store
/// one final time and flushes the logs
pub async fn run() -> Result<(), Error> {
    let startup_pipeline = build_server_start_pipeline(parse_server_args())?;
    let shutdown_pipeline = build_server_shutdown_pipeline()?;
    let ctx = ServerContext::default();

    startup_pipeline
        .run(&ctx)
        .await
        .context("Server startup failed")?;
    info!("Startup successful");

    wait_for_shutdown().await?;
    info!("Shutdown signal received");

    shutdown_pipeline
        .run(&ctx)
        .await
        .context("Clean shutdown failed")
}
