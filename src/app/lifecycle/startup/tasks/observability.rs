use crate::app::lifecycle::context::LoggingContext;
use crate::app::lifecycle::pipeline::BlockingTask;
use crate::core::observability;
use anyhow::{Error, anyhow};
use tracing::info;

pub struct ConfigureObservabilityTask;

impl<C: LoggingContext> BlockingTask<C, Error> for ConfigureObservabilityTask {
    fn run(&self, context: &C) -> Result<(), Error> {
        let logging = context
            .logging()
            .ok_or_else(|| anyhow!("Config not loaded before observability initialization"))?;

        let guards = observability::init(logging)?;
        context.log_guards().lock().extend(guards);

        info!(version = env!("CARGO_PKG_VERSION"), "Observability configured");

        Ok(())
    }
}
