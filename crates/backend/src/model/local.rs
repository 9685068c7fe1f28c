//! LocalModel - folder model backed by the local filesystem.
//!
//! Keeps one entry per registered folder: its configuration, its state
//! tracker and the in-memory index of the last scan. Walks run on tokio's
//! blocking pool so a long scan never stalls the runtime.

use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{
  FolderError, FolderIndex, FolderModel, ScanSummary, StateTracker, check_health, normalize_subdirs, walk_folder,
};
use crate::domain::{
  config::FolderConfig,
  folder::{FolderId, FolderState},
};

#[derive(Debug)]
struct FolderEntry {
  config: FolderConfig,
  state: Arc<StateTracker>,
  /// Held for the duration of a scan, serializing scans of one folder
  index: Mutex<FolderIndex>,
}

/// Filesystem-backed [`FolderModel`]
#[derive(Debug, Default)]
pub struct LocalModel {
  folders: DashMap<FolderId, Arc<FolderEntry>>,
}

impl LocalModel {
  pub fn new() -> Self {
    Self::default()
  }

  fn entry(&self, folder: &FolderId) -> Result<Arc<FolderEntry>, FolderError> {
    self
      .folders
      .get(folder)
      .map(|e| Arc::clone(e.value()))
      .ok_or_else(|| FolderError::UnknownFolder(folder.clone()))
  }

  /// Paths recorded by the last scans of a folder, sorted
  pub async fn files(&self, folder: &FolderId) -> Result<Vec<String>, FolderError> {
    let entry = self.entry(folder)?;
    let index = entry.index.lock().await;
    Ok(index.paths())
  }

  pub fn state_tracker(&self, folder: &FolderId) -> Option<Arc<StateTracker>> {
    self.folders.get(folder).map(|e| Arc::clone(&e.value().state))
  }
}

#[async_trait]
impl FolderModel for LocalModel {
  fn add_folder(&self, config: FolderConfig) -> Arc<StateTracker> {
    let state = Arc::new(StateTracker::new(config.id.clone()));
    let entry = Arc::new(FolderEntry {
      config,
      state: Arc::clone(&state),
      index: Mutex::new(FolderIndex::new()),
    });

    debug!(folder = %entry.config.id, path = %entry.config.path.display(), "Registered folder");
    self.folders.insert(entry.config.id.clone(), entry);
    state
  }

  fn remove_folder(&self, folder: &FolderId) {
    if self.folders.remove(folder).is_some() {
      debug!(folder = %folder, "Unregistered folder");
    }
  }

  async fn check_folder_health(&self, folder: &FolderId) -> Result<(), FolderError> {
    let entry = self.entry(folder)?;
    check_health(&entry.config).map_err(FolderError::from)
  }

  async fn scan_folder_subdirs(&self, folder: &FolderId, subdirs: &[String]) -> Result<ScanSummary, FolderError> {
    let entry = self.entry(folder)?;
    let subdirs = normalize_subdirs(subdirs)?;

    // The walk would fail anyway; record why before reporting it
    if let Err(err) = check_health(&entry.config) {
      let err = FolderError::from(err);
      entry.state.set_error(&err).await;
      return Err(err);
    }

    let mut index = entry.index.lock().await;
    entry.state.set_state(FolderState::Scanning).await;
    let start = Instant::now();

    let root = entry.config.path.clone();
    let marker = entry.config.marker_name.clone();
    let scope = subdirs.clone();
    let walked = tokio::task::spawn_blocking(move || walk_folder(&root, &scope, &marker))
      .await
      .unwrap_or_else(|e| {
        Err(FolderError::Walk {
          path: entry.config.path.clone(),
          message: format!("scan task failed: {e}"),
        })
      });

    match walked {
      Ok(observed) => {
        let summary = index.apply(&subdirs, observed);
        entry.state.set_state(FolderState::Idle).await;
        if summary.has_changes() {
          info!(
            folder = %folder,
            added = summary.added,
            changed = summary.changed,
            deleted = summary.deleted,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scan found changes"
          );
        } else {
          debug!(
            folder = %folder,
            scanned = summary.scanned,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scan complete, no changes"
          );
        }
        Ok(summary)
      }
      Err(err) => {
        entry.state.set_error(&err).await;
        Err(err)
      }
    }
  }
}
