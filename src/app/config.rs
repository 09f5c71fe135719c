use crate::app::cli::{AgentArgs, ServerArgs};
use anyhow::bail;
use config::{Config, ConfigBuilder, builder::DefaultState};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(default)]
#[builder(default)]
pub struct ServerConfig {
    /// Listen address, host:port
    pub address: String,
    /// Seconds between saves, 0 saves synchronously after every mutation
    pub store_interval: u64,
    /// Json file holding saved metrics, empty disables persistence
    pub file_storage_path: String,
    /// Whether to load the saved metrics before serving
    pub restore: bool,
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "localhost:8080".to_string(),
            store_interval: 300,
            file_storage_path: "/tmp/metrics-db.json".to_string(),
            restore: true,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(default)]
#[builder(default)]
pub struct AgentConfig {
    /// Server address, host:port or a full http url
    pub address: String,
    /// Seconds between pushes to the server
    pub report_interval: u64,
    /// Seconds between runtime samples
    pub poll_interval: u64,
    /// Gzip request bodies
    pub compress: bool,
    pub logging: LoggingConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            address: "localhost:8080".to_string(),
            report_interval: 10,
            poll_interval: 2,
            compress: true,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRotation {
    #[default]
    Daily,
    Hourly,
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSink {
    #[serde(flatten)]
    pub dest: LogType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogType {
    Stdout {
        #[serde(default = "default_logtype_color")]
        color: bool,
        #[serde(default)]
        json: bool,
        #[serde(default)]
        spans: bool,
    },
    File {
        path: PathBuf,
        #[serde(default)]
        json: bool,
        #[serde(default)]
        rotation: FileRotation,
        #[serde(default)]
        max_files: usize,
        #[serde(default)]
        spans: bool,
    },
}

fn default_logtype_color() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub sinks: Vec<LogSink>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            sinks: vec![LogSink {
                dest: LogType::Stdout {
                    color: true,
                    json: false,
                    spans: false,
                },
            }],
        }
    }
}

impl LoggingConfig {
    /// Validates the logging configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.sinks.is_empty() {
            anyhow::bail!("At least one logging sink must be configured");
        }

        // Validate level can be parsed
        self.level.parse::<tracing::Level>().map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: trace, debug, info, warn, error",
                self.level
            )
        })?;

        Ok(())
    }
}

fn file_builder(config_file: &Option<PathBuf>) -> ConfigBuilder<DefaultState> {
    let builder = Config::builder();

    match config_file {
        Some(path) => builder.add_source(config::File::from(path.to_path_buf())),
        None => builder,
    }
}

impl ServerConfig {
    /// Layers the optional config file under the command line and
    /// environment values resolved in `args`
    pub fn load(args: &ServerArgs) -> Result<ServerConfig, anyhow::Error> {
        let cfg = file_builder(&args.config_file)
            .set_override_option("address", args.address.clone())?
            .set_override_option("store_interval", args.store_interval)?
            .set_override_option("file_storage_path", args.file_storage_path.clone())?
            .set_override_option("restore", args.restore)?
            .set_override_option("logging.level", args.log_level.clone())?
            .build()?;

        let config: ServerConfig = cfg.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.address.is_empty() {
            bail!("Server address must not be empty");
        }

        self.logging.validate()
    }

    /// Path of the persisted metrics, `None` when persistence is disabled
    pub fn storage_path(&self) -> Option<PathBuf> {
        if self.file_storage_path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.file_storage_path))
        }
    }

    /// `None` means saves happen synchronously after every mutation
    pub fn save_period(&self) -> Option<Duration> {
        match self.store_interval {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl AgentConfig {
    /// Layers the optional config file under the command line and
    /// environment values resolved in `args`
    pub fn load(args: &AgentArgs) -> Result<AgentConfig, anyhow::Error> {
        let cfg = file_builder(&args.config_file)
            .set_override_option("address", args.address.clone())?
            .set_override_option("report_interval", args.report_interval)?
            .set_override_option("poll_interval", args.poll_interval)?
            .set_override_option("logging.level", args.log_level.clone())?
            .build()?;

        let config: AgentConfig = cfg.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.address.is_empty() {
            bail!("Server address must not be empty");
        }
        if self.poll_interval == 0 {
            bail!("poll_interval must be at least one second");
        }
        if self.report_interval == 0 {
            bail!("report_interval must be at least one second");
        }

        self.logging.validate()
    }

    pub fn poll_period(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    pub fn report_period(&self) -> Duration {
        Duration::from_secs(self.report_interval)
    }
}
