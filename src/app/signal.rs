use anyhow::{Context, Error};

/// Resolves on ctrl-c, or SIGTERM on unix
pub async fn wait_for_shutdown() -> Result<(), Error> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate =
            signal(SignalKind::terminate()).context("failed to listen for sigterm")?;

        tokio::select! {
            res = tokio::signal::ctrl_c() => res.context("failed to listen for sigint")?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for sigint")?;

    Ok(())
}
