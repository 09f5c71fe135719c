use clap::{Arg, ArgMatches, Command, ValueHint, value_parser};
use std::ffi::OsString;
use std::path::PathBuf;

const ARGS_CONFIG_FILE: &str = "config-file";
const ARGS_ADDRESS: &str = "address";
const ARGS_LOG_LEVEL: &str = "log-level";
const ARGS_STORE_INTERVAL: &str = "store-interval";
const ARGS_FILE_STORAGE_PATH: &str = "file-storage-path";
const ARGS_RESTORE: &str = "restore";
const ARGS_REPORT_INTERVAL: &str = "report-interval";
const ARGS_POLL_INTERVAL: &str = "poll-interval";

/// Values given on the command line or through their environment
/// variables, `None` leaves the config file or default in place
#[derive(Debug, Default, Clone)]
pub struct ServerArgs {
    pub config_file: Option<PathBuf>,
    pub address: Option<String>,
    pub store_interval: Option<u64>,
    pub file_storage_path: Option<String>,
    pub restore: Option<bool>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct AgentArgs {
    pub config_file: Option<PathBuf>,
    pub address: Option<String>,
    pub report_interval: Option<u64>,
    pub poll_interval: Option<u64>,
    pub log_level: Option<String>,
}

fn common_args(cmd: Command) -> Command {
    cmd.version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new(ARGS_CONFIG_FILE)
                .help("Config file path")
                .num_args(1)
                .value_name("CONFIG FILE")
                .value_hint(ValueHint::FilePath)
                .value_parser(value_parser!(PathBuf))
                .env("METRICD_CONFIG")
                .short('c')
                .long("config-file"),
        )
        .arg(
            Arg::new(ARGS_ADDRESS)
                .help("Server address, host:port")
                .num_args(1)
                .value_name("ADDRESS")
                .env("ADDRESS")
                .short('a')
                .long("address"),
        )
        .arg(
            Arg::new(ARGS_LOG_LEVEL)
                .help("Log level: trace, debug, info, warn, error")
                .num_args(1)
                .value_name("LEVEL")
                .env("LOG_LEVEL")
                .short('l')
                .long("log-level"),
        )
}

pub fn build_server_command() -> Command {
    common_args(Command::new("metricd-server"))
        .arg(
            Arg::new(ARGS_STORE_INTERVAL)
                .help("Seconds between saves to disk, 0 saves after every update")
                .num_args(1)
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .env("STORE_INTERVAL")
                .short('i')
                .long("store-interval"),
        )
        .arg(
            Arg::new(ARGS_FILE_STORAGE_PATH)
                .help("File the metrics are saved to, empty disables saving")
                .num_args(1)
                .value_name("FILE")
                .value_hint(ValueHint::FilePath)
                .env("FILE_STORAGE_PATH")
                .short('f')
                .long("file-storage-path"),
        )
        .arg(
            Arg::new(ARGS_RESTORE)
                .help("Load previously saved metrics on start")
                .num_args(1)
                .value_name("true|false")
                .value_parser(value_parser!(bool))
                .env("RESTORE")
                .short('r')
                .long("restore"),
        )
}

pub fn build_agent_command() -> Command {
    common_args(Command::new("metricd-agent"))
        .arg(
            Arg::new(ARGS_REPORT_INTERVAL)
                .help("Seconds between pushes to the server")
                .num_args(1)
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .env("REPORT_INTERVAL")
                .short('r')
                .long("report-interval"),
        )
        .arg(
            Arg::new(ARGS_POLL_INTERVAL)
                .help("Seconds between runtime samples")
                .num_args(1)
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .env("POLL_INTERVAL")
                .short('p')
                .long("poll-interval"),
        )
}

fn server_args(args: &ArgMatches) -> ServerArgs {
    ServerArgs {
        config_file: args.get_one::<PathBuf>(ARGS_CONFIG_FILE).cloned(),
        address: args.get_one::<String>(ARGS_ADDRESS).cloned(),
        store_interval: args.get_one::<u64>(ARGS_STORE_INTERVAL).copied(),
        file_storage_path: args.get_one::<String>(ARGS_FILE_STORAGE_PATH).cloned(),
        restore: args.get_one::<bool>(ARGS_RESTORE).copied(),
        log_level: args.get_one::<String>(ARGS_LOG_LEVEL).cloned(),
    }
}

fn agent_args(args: &ArgMatches) -> AgentArgs {
    AgentArgs {
        config_file: args.get_one::<PathBuf>(ARGS_CONFIG_FILE).cloned(),
        address: args.get_one::<String>(ARGS_ADDRESS).cloned(),
        report_interval: args.get_one::<u64>(ARGS_REPORT_INTERVAL).copied(),
        poll_interval: args.get_one::<u64>(ARGS_POLL_INTERVAL).copied(),
        log_level: args.get_one::<String>(ARGS_LOG_LEVEL).cloned(),
    }
}

/// Parses the process arguments, exiting with usage on error or `--help`
pub fn parse_server_args() -> ServerArgs {
    server_args(&build_server_command().get_matches())
}

pub fn parse_server_args_from<I, T>(itr: I) -> Result<ServerArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Ok(server_args(&build_server_command().try_get_matches_from(itr)?))
}

/// Parses the process arguments, exiting with usage on error or `--help`
pub fn parse_agent_args() -> AgentArgs {
    agent_args(&build_agent_command().get_matches())
}

pub fn parse_agent_args_from<I, T>(itr: I) -> Result<AgentArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Ok(agent_args(&build_agent_command().try_get_matches_from(itr)?))
}
