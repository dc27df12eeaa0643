//! Structured logging for a run.
//!
//! Events go to stderr at the console level and to one log file per run.
//! File lines read `<YYYY-MM-DD HH:MM:SS>  <message>`.

use crate::constants::{LOG_FILE_PREFIX, LOG_FILE_TIMESTAMP_FORMAT, LOG_LINE_TIMESTAMP_FORMAT};
use crate::error::{NormalizerError, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{Subscriber, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Local wall-clock timestamp followed by a separator space
#[derive(Debug, Clone, Copy)]
struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{} ", Local::now().format(LOG_LINE_TIMESTAMP_FORMAT))
    }
}

/// Keeps the run log flushing; hold it until the run is over
#[derive(Debug)]
pub struct RunLog {
    pub path: PathBuf,
    _guard: WorkerGuard,
}

/// Name of the log file for a run started now
pub fn run_log_file_name() -> String {
    format!(
        "{}_{}.log",
        LOG_FILE_PREFIX,
        Local::now().format(LOG_FILE_TIMESTAMP_FORMAT)
    )
}

/// Layer writing `<timestamp>  <message>` lines, without ANSI, level or target
pub fn run_file_layer<S, W>(
    writer: W,
    file_level: &str,
) -> impl Layer<S> + Send + Sync + use<S, W>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .with_timer(LocalTimestamp)
        .with_filter(EnvFilter::new(format!("esker_normalizer={}", file_level)))
}

/// Set up console and run-file logging
pub fn setup_logging(
    console_level: &str,
    file_level: &str,
    quiet: bool,
    log_dir: &Path,
) -> Result<RunLog> {
    std::fs::create_dir_all(log_dir).map_err(|e| NormalizerError::io(log_dir, e))?;

    let file_name = run_log_file_name();
    let prefix = file_name.trim_end_matches(".log").to_string();
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| NormalizerError::Logging {
            message: format!("cannot create log file in {}: {}", log_dir.display(), e),
        })?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("esker_normalizer={}", console_level)));

    let console_layer = if quiet {
        fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .compact()
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_timer(fmt::time::uptime())
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(run_file_layer(non_blocking, file_level))
        .with(console_layer)
        .try_init()
        .map_err(|e| NormalizerError::Logging {
            message: e.to_string(),
        })?;

    let path = log_dir.join(file_name);
    debug!("Logging initialized, run log at {}", path.display());
    Ok(RunLog {
        path,
        _guard: guard,
    })
}
