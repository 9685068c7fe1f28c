//! Daemon command

use std::path::Path;

use anyhow::Result;
use foldersync::{Daemon, config::Config, dirs};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::load_config;
use crate::logging::init_daemon_logging;

/// Run the daemon in this process until Ctrl-C
pub async fn cmd_daemon(config_path: Option<&Path>) -> Result<()> {
  // First run: drop a template at the user config path
  let created = match config_path {
    Some(_) => None,
    None => Some(Config::write_template_if_missing(&dirs::config_file_path())),
  };

  let daemon = Daemon::new(load_config(config_path)?);
  let _guard = init_daemon_logging(&daemon.config().daemon);

  match created {
    Some(Ok(true)) => info!(path = %dirs::config_file_path().display(), "Created user config"),
    Some(Err(e)) => warn!(error = %e, "Failed to create user config"),
    _ => {}
  }
  info!(log_file = %dirs::log_file_path().display(), "Starting foldersync daemon");

  daemon.run(CancellationToken::new()).await;
  Ok(())
}
