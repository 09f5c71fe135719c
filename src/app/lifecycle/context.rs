use crate::app::config::{AgentConfig, LoggingConfig, ServerConfig};
use crate::core::persistence::PersistenceManager;
use crate::core::storage::{MemStorage, Storage};
use actix_web::dev::ServerHandle;
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_appender::non_blocking::WorkerGuard;

/// Contexts whose logging is configured by the observability tasks
pub trait LoggingContext: Send + Sync {
    fn logging(&self) -> Option<&LoggingConfig>;

    fn log_guards(&self) -> &Mutex<Vec<WorkerGuard>>;
}

#[derive(Default)]
pub struct ServerContext {
    pub config: OnceLock<ServerConfig>,
    /// Flushes buffered log lines once dropped
    pub log_guards: Mutex<Vec<WorkerGuard>>,

    /// The store handlers write to, wrapped to save synchronously
    /// when the store interval is 0
    pub store: OnceLock<Arc<dyn Storage>>,
    /// `None` when no storage path is configured
    pub persistence: OnceLock<Option<Arc<PersistenceManager>>>,
    /// Periodic saver loop, absent for synchronous saving
    pub saver: Mutex<Option<JoinHandle<()>>>,
    pub cancel: CancellationToken,

    /// The web server
    pub server: OnceLock<ServerHandle>,
}

impl LoggingContext for ServerContext {
    fn logging(&self) -> Option<&LoggingConfig> {
        self.config.get().map(|config| &config.logging)
    }

    fn log_guards(&self) -> &Mutex<Vec<WorkerGuard>> {
        &self.log_guards
    }
}

pub struct AgentContext {
    pub config: OnceLock<AgentConfig>,
    pub log_guards: Mutex<Vec<WorkerGuard>>,

    /// Samples land here and are drained by the transmitter
    pub store: Arc<dyn Storage>,
    pub cancel: CancellationToken,
    /// Sampler and transmitter loops
    pub loops: Mutex<Vec<JoinHandle<()>>>,
}

impl Default for AgentContext {
    fn default() -> Self {
        AgentContext {
            config: OnceLock::new(),
            log_guards: Mutex::new(Vec::new()),
            store: Arc::new(MemStorage::new()),
            cancel: CancellationToken::new(),
            loops: Mutex::new(Vec::new()),
        }
    }
}

impl LoggingContext for AgentContext {
    fn logging(&self) -> Option<&LoggingConfig> {
        self.config.get().map(|config| &config.logging)
    }

    fn log_guards(&self) -> &Mutex<Vec<WorkerGuard>> {
        &self.log_guards
    }
}
