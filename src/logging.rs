//! File logging so stdout stays reserved for command output.

use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "JOBTRACK_LOG";
const LOG_FILE: &str = "jobtrack.log";

/// Build the filter: JOBTRACK_LOG wins over the configured level, noisy
/// HTTP internals are capped at warn.
fn build_env_filter(level: &str) -> Result<EnvFilter> {
  let base = std::env::var(LOG_ENV).unwrap_or_else(|_| level.to_string());
  let directives = format!("{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn", base);
  EnvFilter::try_new(&directives).map_err(|e| eyre!("Invalid log filter '{}': {}", directives, e))
}

/// Directory holding the log file.
fn log_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("jobtrack"))
}

/// Initialize logging to `<data dir>/jobtrack/jobtrack.log`.
///
/// The returned guard flushes buffered lines on drop; keep it alive for the
/// whole run.
pub fn init(level: &str) -> Result<WorkerGuard> {
  let dir = log_dir()?;
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let file_layer = tracing_subscriber::fmt::layer()
    .with_ansi(false)
    .with_target(true)
    .with_writer(writer);

  tracing_subscriber::registry()
    .with(build_env_filter(level)?)
    .with(file_layer)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  tracing::debug!(dir = %dir.display(), "logging initialized");
  Ok(guard)
}
