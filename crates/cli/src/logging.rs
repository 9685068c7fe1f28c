//! Logging setup for CLI commands and the daemon

use foldersync::{config::DaemonConfig, dirs};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize logging for CLI commands (console only)
pub fn init_cli_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::builder().with_default_directive(tracing::Level::WARN.into()).from_env_lossy())
    .with_writer(std::io::stderr)
    .init();
}

/// Parse log level from config string
fn parse_log_level(level: &str) -> tracing::level_filters::LevelFilter {
  use tracing::level_filters::LevelFilter;

  match level.to_lowercase().as_str() {
    "off" => LevelFilter::OFF,
    "error" => LevelFilter::ERROR,
    "warn" => LevelFilter::WARN,
    "info" => LevelFilter::INFO,
    "debug" => LevelFilter::DEBUG,
    "trace" => LevelFilter::TRACE,
    _ => LevelFilter::INFO,
  }
}

/// Initialize logging for the daemon with config-driven settings.
///
/// Logs go to the console with colors and to a rolling log file without.
/// If the log directory cannot be created, console logging alone is used.
///
/// Returns the guard that must be kept alive for the duration of the program
pub fn init_daemon_logging(daemon_config: &DaemonConfig) -> Option<WorkerGuard> {
  let level = parse_log_level(&daemon_config.log_level);

  // RUST_LOG overrides the configured level
  let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
  let console = fmt::layer().with_target(true).with_ansi(true);

  let log_dir = dirs::default_data_dir();
  if std::fs::create_dir_all(&log_dir).is_err() {
    tracing_subscriber::registry().with(env_filter).with(console).init();
    return None;
  }

  let file_appender = match daemon_config.log_rotation.as_str() {
    "hourly" => tracing_appender::rolling::hourly(&log_dir, dirs::LOG_FILE),
    "never" => tracing_appender::rolling::never(&log_dir, dirs::LOG_FILE),
    _ => tracing_appender::rolling::daily(&log_dir, dirs::LOG_FILE),
  };
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

  tracing_subscriber::registry()
    .with(env_filter)
    .with(console)
    .with(fmt::layer().with_target(true).with_ansi(false).with_writer(file_writer))
    .init();

  Some(guard)
}
