use crate::app::cli::{AgentArgs, ServerArgs};
use crate::app::config::{AgentConfig, ServerConfig};
use crate::app::lifecycle::context::{AgentContext, ServerContext};
use crate::app::lifecycle::pipeline::BlockingTask;
use anyhow::{Context, Error, anyhow};

/// Resolves the server config from defaults, the optional file
/// and the parsed command line
pub struct ServerConfigLoadTask {
    args: ServerArgs,
}

impl ServerConfigLoadTask {
    pub fn new(args: ServerArgs) -> Self {
        Self { args }
    }
}

impl BlockingTask<ServerContext, Error> for ServerConfigLoadTask {
    fn run(&self, ctx: &ServerContext) -> Result<(), Error> {
        let config = ServerConfig::load(&self.args).context("invalid server configuration")?;

        ctx.config
            .set(config)
            .map_err(|_| anyhow!("Server config already loaded"))
    }
}

pub struct AgentConfigLoadTask {
    args: AgentArgs,
}

impl AgentConfigLoadTask {
    pub fn new(args: AgentArgs) -> Self {
        Self { args }
    }
}

impl BlockingTask<AgentContext, Error> for AgentConfigLoadTask {
    fn run(&self, ctx: &AgentContext) -> Result<(), Error> {
        let config = AgentConfig::load(&self.args).context("invalid agent configuration")?;

        ctx.config
            .set(config)
            .map_err(|_| anyhow!("Agent config already loaded"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_into_context() {
        let ctx = ServerContext::default();
        let args = ServerArgs {
            address: Some("127.0.0.1:0".into()),
            store_interval: Some(0),
            ..Default::default()
        };

        ServerConfigLoadTask::new(args).run(&ctx).unwrap();

        let config = ctx.config.get().unwrap();
        assert_eq!(config.address, "127.0.0.1:0");
        assert_eq!(config.save_period(), None);
    }

    #[test]
    fn test_invalid_agent_config_fails() {
        let ctx = AgentContext::default();
        let args = AgentArgs {
            report_interval: Some(0),
            ..Default::default()
        };

        assert!(AgentConfigLoadTask::new(args).run(&ctx).is_err());
        assert!(ctx.config.get().is_none());
    }
}
