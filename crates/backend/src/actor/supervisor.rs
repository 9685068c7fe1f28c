//! FolderSupervisor - starts, tracks and stops folder services
//!
//! The supervisor maps folder ids to running services. Services are built
//! through the constructor registry, so the supervisor never names a
//! concrete folder variant.
//!
//! # Lifecycle
//!
//! - `start_folder` registers the folder with the model and spawns its service
//! - Each service gets a child `CancellationToken` of the supervisor's token
//! - `stop_folder` fires that token, waits for the service to exit and
//!   unregisters the folder
//! - `shutdown_all` stops every folder concurrently

use std::{sync::Arc, time::Duration};

use dashmap::{DashMap, mapref::entry::Entry};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{folder::FolderContext, handle::FolderHandle, registry};
use crate::{
  domain::{
    config::FolderConfig,
    folder::{FolderId, FolderStatus, FolderType},
  },
  model::{FolderError, FolderModel, ScanSummary, StateTracker},
};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur in the FolderSupervisor
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
  #[error("Folder {0} is already running")]
  AlreadyRunning(FolderId),
  #[error("Folder type {0} is not supported")]
  UnsupportedType(FolderType),
  #[error("Folder {0} is not running")]
  NotRunning(FolderId),
  #[error(transparent)]
  Folder(#[from] FolderError),
}

// ============================================================================
// FolderSupervisor
// ============================================================================

#[derive(Debug)]
struct RunningFolder {
  handle: FolderHandle,
  state: Arc<StateTracker>,
  task: JoinHandle<()>,
}

/// Starts and tracks one service per folder
pub struct FolderSupervisor {
  folders: DashMap<FolderId, RunningFolder>,
  model: Arc<dyn FolderModel>,
  /// Parent of every folder's shutdown token
  cancel: CancellationToken,
  /// Upper bound for on-demand scans issued through the supervisor
  scan_timeout: Option<Duration>,
}

impl FolderSupervisor {
  pub fn new(model: Arc<dyn FolderModel>, cancel: CancellationToken) -> Self {
    Self {
      folders: DashMap::new(),
      model,
      cancel,
      scan_timeout: None,
    }
  }

  /// Bound the wait for on-demand scans
  pub fn with_scan_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.scan_timeout = timeout;
    self
  }

  /// Start the service for a folder
  pub fn start_folder(&self, config: FolderConfig) -> Result<FolderHandle, SupervisorError> {
    let factory = registry::factory_for(config.folder_type).ok_or(SupervisorError::UnsupportedType(config.folder_type))?;

    let vacant = match self.folders.entry(config.id.clone()) {
      Entry::Occupied(_) => return Err(SupervisorError::AlreadyRunning(config.id)),
      Entry::Vacant(vacant) => vacant,
    };

    let id = config.id.clone();
    let folder_type = config.folder_type;
    let interval_s = config.rescan_interval_s;
    let state = self.model.add_folder(config.clone());
    let service = factory(FolderContext {
      config,
      model: Arc::clone(&self.model),
      state: Arc::clone(&state),
      cancel: self.cancel.child_token(),
    });

    let handle = service.handle();
    let task = tokio::spawn(service.serve());
    vacant.insert(RunningFolder {
      handle: handle.clone(),
      state,
      task,
    });

    info!(folder = %id, folder_type = %folder_type, rescan_interval_s = interval_s, "Started folder");
    Ok(handle)
  }

  pub fn handle(&self, id: &FolderId) -> Option<FolderHandle> {
    self.folders.get(id).map(|f| f.handle.clone())
  }

  /// Ids of running folders, sorted
  pub fn list(&self) -> Vec<FolderId> {
    let mut ids: Vec<FolderId> = self.folders.iter().map(|entry| entry.key().clone()).collect();
    ids.sort();
    ids
  }

  pub async fn status(&self, id: &FolderId) -> Option<FolderStatus> {
    let state = self.folders.get(id).map(|f| Arc::clone(&f.state))?;
    Some(state.status().await)
  }

  /// Status of every running folder, sorted by id
  pub async fn statuses(&self) -> Vec<FolderStatus> {
    let trackers: Vec<Arc<StateTracker>> = self.folders.iter().map(|f| Arc::clone(&f.state)).collect();
    let mut statuses = Vec::with_capacity(trackers.len());
    for tracker in trackers {
      statuses.push(tracker.status().await);
    }
    statuses.sort_by(|a, b| a.id.cmp(&b.id));
    statuses
  }

  /// Scan a folder now and wait for the result
  pub async fn scan(&self, id: &FolderId, subdirs: Vec<String>) -> Result<ScanSummary, SupervisorError> {
    let handle = self.handle(id).ok_or_else(|| SupervisorError::NotRunning(id.clone()))?;

    let result = match self.scan_timeout {
      Some(timeout) => tokio::time::timeout(timeout, handle.scan(subdirs))
        .await
        .unwrap_or(Err(FolderError::Timeout(timeout))),
      None => handle.scan(subdirs).await,
    };
    Ok(result?)
  }

  /// Move a folder's next periodic scan
  pub fn delay(&self, id: &FolderId, next: Duration) -> Result<(), SupervisorError> {
    let handle = self.handle(id).ok_or_else(|| SupervisorError::NotRunning(id.clone()))?;
    handle.delay(next)?;
    Ok(())
  }

  /// Stop a folder's service and wait for it to exit
  pub async fn stop_folder(&self, id: &FolderId) -> Result<(), SupervisorError> {
    let (_, running) = self
      .folders
      .remove(id)
      .ok_or_else(|| SupervisorError::NotRunning(id.clone()))?;

    info!(folder = %id, "Stopping folder");
    running.handle.stop();
    if let Err(e) = running.task.await {
      warn!(folder = %id, error = %e, "Folder service ended abnormally");
    }

    self.model.remove_folder(id);
    debug!(folder = %id, "Folder stopped");
    Ok(())
  }

  /// Stop every folder concurrently
  pub async fn shutdown_all(&self) {
    let ids = self.list();
    if ids.is_empty() {
      return;
    }

    info!(count = ids.len(), "Stopping all folders");

    let futures: Vec<_> = ids.iter().map(|id| self.stop_folder(id)).collect();
    futures::future::join_all(futures).await;

    info!("All folders stopped");
  }
}
