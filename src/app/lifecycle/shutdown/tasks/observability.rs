use crate::app::lifecycle::context::LoggingContext;
use crate::app::lifecycle::pipeline::BlockingTask;
use anyhow::Error;
use tracing::info;

/// Drops the log writer guards, flushing whatever is still buffered
pub struct ObservabilityShutdownTask;

impl<C: LoggingContext> BlockingTask<C, Error> for ObservabilityShutdownTask {
    fn run(&self, context: &C) -> Result<(), Error> {
        info!("Shutting down observability");

        let guards = std::mem::take(&mut *context.log_guards().lock());
        drop(guards);

        Ok(())
    }
}
