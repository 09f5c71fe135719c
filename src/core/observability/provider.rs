use crate::app::config::{FileRotation, LogType, LoggingConfig};
use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::time::SystemTime;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::{FmtSpan, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

type DynLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync + 'static>;

struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        const SECONDS_PER_DAY: u64 = 86400;

        let days_since_epoch = (secs / SECONDS_PER_DAY) as i64;
        let seconds_today = secs % SECONDS_PER_DAY;

        let (year, month, day) = days_to_ymd(days_since_epoch);

        write!(
            w,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year,
            month,
            day,
            seconds_today / 3600,
            (seconds_today / 60) % 60,
            seconds_today % 60
        )
    }
}

/// Civil date from days since 1970-01-01
fn days_to_ymd(days: i64) -> (i64, u8, u8) {
    let z = days + 719468;
    let era = z.div_euclid(146097);
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + (month <= 2) as i64;

    (year, month as u8, day as u8)
}

fn span_events(spans: bool) -> FmtSpan {
    if spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn writer_layer(writer: NonBlocking, json: bool, color: bool, spans: bool) -> DynLayer {
    if json {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_span_events(span_events(spans))
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_timer(CompactTime)
            .with_ansi(color)
            .with_writer(writer)
            .with_span_events(span_events(spans))
            .boxed()
    }
}

/// Installs the global subscriber. The returned guards flush their
/// writers when dropped and must be held until shutdown
pub fn init(config: &LoggingConfig) -> Result<Vec<WorkerGuard>> {
    config.validate()?;

    let filter = EnvFilter::builder()
        .with_default_directive("warn".parse()?)
        .from_env_lossy()
        .add_directive(format!("{}={}", env!("CARGO_PKG_NAME"), config.level).parse()?);

    let mut layers: Vec<DynLayer> = Vec::new();
    let mut guards = Vec::new();

    for sink in &config.sinks {
        match &sink.dest {
            LogType::Stdout { color, json, spans } => {
                let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
                guards.push(guard);

                layers.push(writer_layer(writer, *json, *color, *spans));
            }
            LogType::File {
                path,
                json,
                rotation,
                max_files,
                spans,
            } => {
                let (writer, guard) = create_file_writer(path, rotation, *max_files)?;
                guards.push(guard);

                layers.push(writer_layer(writer, *json, false, *spans));
            }
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    Ok(guards)
}

fn create_file_writer(
    path: &Path,
    rotation: &FileRotation,
    max_files: usize,
) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid file name in path: {}", path.display()))?;

    let directory = path
        .parent()
        .ok_or_else(|| anyhow!("Invalid directory in path: {}", path.display()))?;

    if !directory.as_os_str().is_empty() {
        std::fs::create_dir_all(directory)
            .with_context(|| format!("failed to create log directory {}", directory.display()))?;
    }

    let file_appender = match rotation {
        FileRotation::Daily => tracing_appender::rolling::daily(directory, file_name),
        FileRotation::Hourly => tracing_appender::rolling::hourly(directory, file_name),
        FileRotation::Never => tracing_appender::rolling::never(directory, file_name),
    };

    cleanup_old_files(directory, file_name, max_files)?;

    Ok(tracing_appender::non_blocking(file_appender))
}

/// Keeps the `max_files` most recently modified files starting with
/// `prefix`, 0 keeps everything
fn cleanup_old_files(directory: &Path, prefix: &str, max_files: usize) -> Result<()> {
    if max_files == 0 {
        return Ok(());
    }

    let directory = if directory.as_os_str().is_empty() {
        Path::new(".")
    } else {
        directory
    };

    let mut files: Vec<_> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(prefix))
        })
        .filter_map(|entry| {
            entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok().map(|time| (entry.path(), time)))
        })
        .collect();

    if files.len() <= max_files {
        return Ok(());
    }

    files.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in files.iter().skip(max_files) {
        let _ = std::fs::remove_file(path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    #[test]
    fn test_days_to_ymd() {
        assert_eq!(days_to_ymd(0), (1970, 1, 1));
        assert_eq!(days_to_ymd(19782), (2024, 2, 29));
        assert_eq!(days_to_ymd(20380), (2025, 10, 19));
    }

    #[test]
    fn test_cleanup_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::now();

        for (i, name) in ["agent.log.1", "agent.log.2", "agent.log.3"].iter().enumerate() {
            let file = File::create(dir.path().join(name)).unwrap();
            file.set_modified(now - Duration::from_secs(60 * (3 - i as u64)))
                .unwrap();
        }
        File::create(dir.path().join("other.txt")).unwrap();

        cleanup_old_files(dir.path(), "agent.log", 2).unwrap();

        assert!(!dir.path().join("agent.log.1").exists());
        assert!(dir.path().join("agent.log.2").exists());
        assert!(dir.path().join("agent.log.3").exists());
        assert!(dir.path().join("other.txt").exists());
    }

    #[test]
    fn test_cleanup_disabled() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("agent.log.1")).unwrap();

        cleanup_old_files(dir.path(), "agent.log", 0).unwrap();

        assert!(dir.path().join("agent.log.1").exists());
    }
}
