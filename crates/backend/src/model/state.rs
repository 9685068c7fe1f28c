//! Per-folder state tracking for status reporting.
//!
//! Both the model (while scanning) and the folder service (after a failed
//! scan) record errors here. Recording the error a folder is already in is a
//! no-op, so the double report of a single failure never shows up twice.

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};

use super::FolderError;
use crate::domain::folder::{FolderId, FolderState, FolderStatus, StateChanged};

/// Capacity of the state change channel; slow subscribers observe `Lagged`
const EVENT_CAPACITY: usize = 64;

#[derive(Debug)]
struct Inner {
  state: FolderState,
  error: Option<String>,
  changed_at: DateTime<Utc>,
}

/// Tracks the current state of a single folder.
#[derive(Debug)]
pub struct StateTracker {
  folder: FolderId,
  inner: RwLock<Inner>,
  events: broadcast::Sender<StateChanged>,
}

impl StateTracker {
  pub fn new(folder: FolderId) -> Self {
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    Self {
      folder,
      inner: RwLock::new(Inner {
        state: FolderState::Idle,
        error: None,
        changed_at: Utc::now(),
      }),
      events,
    }
  }

  pub fn folder(&self) -> &FolderId {
    &self.folder
  }

  /// Subscribe to state changes
  pub fn subscribe(&self) -> broadcast::Receiver<StateChanged> {
    self.events.subscribe()
  }

  /// Move to a non-error state. Leaving `Error` clears the recorded error.
  ///
  /// Returns true if the state changed.
  pub async fn set_state(&self, state: FolderState) -> bool {
    debug_assert!(state != FolderState::Error, "use set_error to enter the error state");

    let mut inner = self.inner.write().await;
    if inner.state == state {
      return false;
    }

    let from = inner.state;
    inner.state = state;
    inner.error = None;
    inner.changed_at = Utc::now();
    debug!(folder = %self.folder, from = %from, to = %state, "Folder state changed");
    self.publish(from, &inner);
    true
  }

  /// Record an error. A repeat of the current error changes nothing.
  ///
  /// Returns true if the error was recorded.
  pub async fn set_error(&self, err: &FolderError) -> bool {
    let message = err.to_string();
    let mut inner = self.inner.write().await;
    if inner.state == FolderState::Error && inner.error.as_deref() == Some(message.as_str()) {
      return false;
    }

    let from = inner.state;
    inner.state = FolderState::Error;
    inner.error = Some(message);
    inner.changed_at = Utc::now();
    info!(folder = %self.folder, error = %err, "Folder entered error state");
    self.publish(from, &inner);
    true
  }

  pub async fn state(&self) -> FolderState {
    self.inner.read().await.state
  }

  pub async fn status(&self) -> FolderStatus {
    let inner = self.inner.read().await;
    FolderStatus {
      id: self.folder.clone(),
      state: inner.state,
      error: inner.error.clone(),
      changed_at: inner.changed_at,
    }
  }

  fn publish(&self, from: FolderState, inner: &Inner) {
    // No subscribers is fine
    let _ = self.events.send(StateChanged {
      folder: self.folder.clone(),
      from,
      to: inner.state,
      error: inner.error.clone(),
      at: inner.changed_at,
    });
  }
}
