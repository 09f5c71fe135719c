use async_trait::async_trait;

/// A synchronous unit of work run against a shared context
pub trait BlockingTask<C, E>: Send + Sync {
    fn run(&self, context: &C) -> Result<(), E>;
}

/// An asynchronous unit of work run against a shared context
#[async_trait]
pub trait AsyncTask<C: Sync, E>: Send + Sync {
    async fn run(&self, context: &C) -> Result<(), E>;
}

enum Stage<C: Sync, E> {
    Blocking(Box<dyn BlockingTask<C, E>>),
    Async(Box<dyn AsyncTask<C, E>>),
}

/// Ordered list of tasks sharing one context. The first task returning
/// an error stops the run and its error is returned
pub struct Pipeline<C: Sync, E> {
    stages: Vec<Stage<C, E>>,
}

impl<C: Sync, E> Pipeline<C, E> {
    pub async fn run(&self, context: &C) -> Result<(), E> {
        for stage in &self.stages {
            match stage {
                Stage::Blocking(task) => task.run(context)?,
                Stage::Async(task) => task.run(context).await?,
            }
        }

        Ok(())
    }
}

pub struct PipelineBuilder<C: Sync, E> {
    stages: Vec<Stage<C, E>>,
}

impl<C: Sync, E> Default for PipelineBuilder<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Sync, E> PipelineBuilder<C, E> {
    pub fn new() -> Self {
        PipelineBuilder { stages: Vec::new() }
    }

    pub fn with_blocking(mut self, task: Box<dyn BlockingTask<C, E>>) -> Self {
        self.stages.push(Stage::Blocking(task));
        self
    }

    pub fn with_async(mut self, task: Box<dyn AsyncTask<C, E>>) -> Self {
        self.stages.push(Stage::Async(task));
        self
    }

    /// `None` when no task was added
    pub fn build(self) -> Option<Pipeline<C, E>> {
        if self.stages.is_empty() {
            return None;
        }

        Some(Pipeline {
            stages: self.stages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Error, bail};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Trail {
        steps: Mutex<Vec<&'static str>>,
    }

    struct Step(&'static str);

    impl BlockingTask<Trail, Error> for Step {
        fn run(&self, context: &Trail) -> Result<(), Error> {
            context.steps.lock().push(self.0);
            Ok(())
        }
    }

    struct AsyncStep(&'static str);

    #[async_trait]
    impl AsyncTask<Trail, Error> for AsyncStep {
        async fn run(&self, context: &Trail) -> Result<(), Error> {
            tokio::task::yield_now().await;
            context.steps.lock().push(self.0);
            Ok(())
        }
    }

    struct Fail;

    impl BlockingTask<Trail, Error> for Fail {
        fn run(&self, _context: &Trail) -> Result<(), Error> {
            bail!("boom")
        }
    }

    #[test]
    fn test_empty_builder() {
        assert!(PipelineBuilder::<Trail, Error>::new().build().is_none());
    }

    #[tokio::test]
    async fn test_runs_in_order() {
        let pipeline = PipelineBuilder::new()
            .with_blocking(Box::new(Step("config")))
            .with_async(Box::new(AsyncStep("server")))
            .with_blocking(Box::new(Step("ready")))
            .build()
            .unwrap();
        let trail = Trail::default();

        pipeline.run(&trail).await.unwrap();

        assert_eq!(*trail.steps.lock(), vec!["config", "server", "ready"]);
    }

    #[tokio::test]
    async fn test_error_stops_run() {
        let pipeline = PipelineBuilder::new()
            .with_blocking(Box::new(Step("config")))
            .with_blocking(Box::new(Fail))
            .with_async(Box::new(AsyncStep("server")))
            .build()
            .unwrap();
        let trail = Trail::default();

        let err = pipeline.run(&trail).await.unwrap_err();

        assert_eq!(err.to_string(), "boom");
        assert_eq!(*trail.steps.lock(), vec!["config"]);
    }
}
