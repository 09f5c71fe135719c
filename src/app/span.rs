use crate::app::lifecycle::pipeline::{AsyncTask, Pipeline};
use anyhow::Error;
use async_trait::async_trait;
use tracing::{Instrument, Span};

/// A task wrapping a whole pipeline so that every task in it
/// runs under the span produced by the span provider
pub struct WrappedPipelineTask<T: Send + Sync> {
    pipeline: Pipeline<T, Error>,
    span_provider: Box<dyn Fn() -> Span + Send + Sync>,
}

impl<T: Send + Sync> WrappedPipelineTask<T> {
    pub fn new<F>(pipeline: Pipeline<T, Error>, span_provider: F) -> Self
    where
        F: Fn() -> Span + Sync + Send + 'static,
    {
        WrappedPipelineTask {
            pipeline,
            span_provider: Box::new(span_provider),
        }
    }
}

#[async_trait]
impl<T: Send + Sync> AsyncTask<T, Error> for WrappedPipelineTask<T> {
    async fn run(&self, context: &T) -> Result<(), Error> {
        let span = (self.span_provider)();

        self.pipeline.run(context).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::lifecycle::pipeline::{BlockingTask, PipelineBuilder};
    use parking_lot::Mutex;
    use tracing::info_span;

    #[derive(Default)]
    struct Seen {
        spans: Mutex<Vec<Option<String>>>,
    }

    struct RecordSpan;

    impl BlockingTask<Seen, Error> for RecordSpan {
        fn run(&self, context: &Seen) -> Result<(), Error> {
            let name = Span::current().metadata().map(|m| m.name().to_string());
            context.spans.lock().push(name);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_inner_tasks_run() {
        let inner = PipelineBuilder::new()
            .with_blocking(Box::new(RecordSpan))
            .with_blocking(Box::new(RecordSpan))
            .build()
            .unwrap();
        let outer = PipelineBuilder::new()
            .with_async(Box::new(WrappedPipelineTask::new(inner, || {
                info_span!("shutdown_pipeline")
            })))
            .build()
            .unwrap();
        let seen = Seen::default();

        outer.run(&seen).await.unwrap();

        assert_eq!(seen.spans.lock().len(), 2);
    }
}
