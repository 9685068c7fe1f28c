//! Folder model - the collaborators a folder service drives
//!
//! The folder service decides *when* to scan. Everything about *how* lives
//! behind the [`FolderModel`] trait:
//!
//! - health checks (is the folder reachable and configured correctly)
//! - scan execution (walk the folder, diff against the last known index)
//! - state tracking (Idle/Scanning/Error, deduplicated error recording)
//!
//! [`LocalModel`] is the production implementation backed by the local
//! filesystem and an in-memory index.

use std::{path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{config::FolderConfig, folder::FolderId};

mod health;
mod index;
mod local;
mod state;
mod walk;

pub use health::{HealthError, check_health};
pub use index::{FileRecord, FolderIndex};
pub use local::LocalModel;
pub use state::StateTracker;
pub use walk::{normalize_subdirs, walk_folder};

// ============================================================================
// Errors
// ============================================================================

/// Errors reported by the model and surfaced through folder services
///
/// Cloneable so the same error can be recorded in the state tracker and
/// returned to an on-demand requester.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FolderError {
  #[error("Unknown folder: {0}")]
  UnknownFolder(FolderId),

  #[error(transparent)]
  Unhealthy(#[from] HealthError),

  #[error("Invalid subdirectory {path:?}: {reason}")]
  InvalidSubdir { path: String, reason: &'static str },

  #[error("Scan failed at {}: {message}", path.display())]
  Walk { path: PathBuf, message: String },

  #[error("Folder service has stopped")]
  ServiceStopped,

  #[error("Scan request timed out after {0:?}")]
  Timeout(Duration),
}

// ============================================================================
// Scan results
// ============================================================================

/// Outcome of a successful scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
  /// Entries observed by the walk
  pub scanned: usize,
  /// Entries not present in the index before
  pub added: usize,
  /// Entries whose size, mtime or kind changed
  pub changed: usize,
  /// Indexed entries in scope that no longer exist
  pub deleted: usize,
}

impl ScanSummary {
  pub fn has_changes(&self) -> bool {
    self.added + self.changed + self.deleted > 0
  }
}

// ============================================================================
// FolderModel
// ============================================================================

/// Collaborators consumed by folder services.
///
/// Implementations must tolerate one scan at a time per folder; a folder
/// service never calls `scan_folder_subdirs` concurrently for the same folder.
#[async_trait]
pub trait FolderModel: Send + Sync {
  /// Register a folder and return its state tracker.
  ///
  /// The returned tracker is shared between the model and the folder
  /// service, so errors recorded by either side are deduplicated.
  fn add_folder(&self, config: FolderConfig) -> Arc<StateTracker>;

  /// Forget a folder (after its service has stopped)
  fn remove_folder(&self, folder: &FolderId);

  /// Whether the folder can currently be synchronized. Never mutates state.
  async fn check_folder_health(&self, folder: &FolderId) -> Result<(), FolderError>;

  /// Scan the folder, restricted to `subdirs` (empty = whole folder).
  ///
  /// May record the folder's error state as a side effect.
  async fn scan_folder_subdirs(&self, folder: &FolderId, subdirs: &[String]) -> Result<ScanSummary, FolderError>;
}
