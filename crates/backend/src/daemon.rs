//! Daemon lifecycle management.
//!
//! The daemon owns the folder model and the supervisor, starts one service
//! per configured folder and keeps them running until Ctrl-C or until the
//! caller's cancellation token fires.
//!
//! # Architecture
//!
//! ```text
//! Daemon
//!   └── FolderSupervisor
//!         └── SendOnlyFolder (per folder, built through the registry)
//!               └── LocalModel (shared health checks and scans)
//! ```
//!
//! # Lifecycle
//!
//! 1. Create the shared `LocalModel`
//! 2. Create the `FolderSupervisor` with a child token
//! 3. Start every configured folder; one failing folder does not stop the rest
//! 4. Wait for Ctrl-C or cancellation
//! 5. Graceful shutdown: stop every folder and wait for its loop to exit

use std::sync::Arc;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
  actor::FolderSupervisor,
  domain::config::Config,
  model::{FolderModel, LocalModel},
};

/// The folder daemon.
///
/// # Usage
///
/// ```ignore
/// let daemon = Daemon::new(Config::load_default()?);
/// daemon.run(CancellationToken::new()).await;
/// ```
pub struct Daemon {
  config: Config,
}

impl Daemon {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Run the daemon until Ctrl-C or until `cancel` fires.
  pub async fn run(self, cancel: CancellationToken) {
    info!(folders = self.config.folders.len(), "Starting folder daemon");

    let model: Arc<dyn FolderModel> = Arc::new(LocalModel::new());
    let supervisor =
      FolderSupervisor::new(model, cancel.child_token()).with_scan_timeout(self.config.daemon.scan_timeout());

    let mut started = 0;
    for folder in self.config.folders {
      let id = folder.id.clone();
      match supervisor.start_folder(folder) {
        Ok(_) => started += 1,
        Err(e) => error!(folder = %id, error = %e, "Failed to start folder"),
      }
    }
    info!(started, "Folders started");

    tokio::select! {
      result = signal::ctrl_c() => match result {
        Ok(()) => info!("Received ctrl-c, shutting down..."),
        Err(e) => warn!("Failed to listen for ctrl-c: {}", e),
      },
      _ = cancel.cancelled() => info!("Shutdown requested"),
    }

    cancel.cancel();
    supervisor.shutdown_all().await;

    info!("Daemon shutdown complete");
  }
}
