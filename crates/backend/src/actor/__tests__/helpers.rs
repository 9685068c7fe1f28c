//! Test helpers for folder service tests.
//!
//! Provides `MockModel`, a scripted [`FolderModel`] that records every call,
//! and constructors for folder services wired to it.

use std::{
  collections::{HashMap, VecDeque},
  sync::{Arc, Mutex},
  time::Duration,
};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
  actor::{folder::FolderContext, send_only::SendOnlyFolder},
  domain::{config::FolderConfig, folder::FolderId},
  model::{FolderError, FolderModel, HealthError, ScanSummary, StateTracker},
};

/// A call made to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelCall {
  Health,
  Scan(Vec<String>),
}

/// Scripted folder model.
///
/// Health checks and scans pop their results from queues and succeed once a
/// queue is empty. Failed scans are recorded on the folder's tracker, the
/// way a real model does while scanning.
#[derive(Default)]
pub struct MockModel {
  health: Mutex<VecDeque<Result<(), FolderError>>>,
  scans: Mutex<VecDeque<Result<ScanSummary, FolderError>>>,
  calls: Mutex<Vec<ModelCall>>,
  trackers: Mutex<HashMap<FolderId, Arc<StateTracker>>>,
  scan_delay: Option<Duration>,
}

impl MockModel {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  /// Every scan takes `delay` to complete
  pub fn with_scan_delay(delay: Duration) -> Arc<Self> {
    Arc::new(Self {
      scan_delay: Some(delay),
      ..Self::default()
    })
  }

  pub fn push_health(&self, result: Result<(), FolderError>) {
    self.health.lock().unwrap().push_back(result);
  }

  pub fn push_scan(&self, result: Result<ScanSummary, FolderError>) {
    self.scans.lock().unwrap().push_back(result);
  }

  pub fn calls(&self) -> Vec<ModelCall> {
    self.calls.lock().unwrap().clone()
  }

  pub fn scan_calls(&self) -> Vec<Vec<String>> {
    self
      .calls()
      .into_iter()
      .filter_map(|c| match c {
        ModelCall::Scan(subdirs) => Some(subdirs),
        ModelCall::Health => None,
      })
      .collect()
  }

  pub fn tracker(&self, folder: &FolderId) -> Option<Arc<StateTracker>> {
    self.trackers.lock().unwrap().get(folder).cloned()
  }

  fn record(&self, call: ModelCall) {
    self.calls.lock().unwrap().push(call);
  }
}

#[async_trait]
impl FolderModel for MockModel {
  fn add_folder(&self, config: FolderConfig) -> Arc<StateTracker> {
    let state = Arc::new(StateTracker::new(config.id.clone()));
    self.trackers.lock().unwrap().insert(config.id, Arc::clone(&state));
    state
  }

  fn remove_folder(&self, folder: &FolderId) {
    self.trackers.lock().unwrap().remove(folder);
  }

  async fn check_folder_health(&self, _folder: &FolderId) -> Result<(), FolderError> {
    self.record(ModelCall::Health);
    let next = self.health.lock().unwrap().pop_front();
    next.unwrap_or(Ok(()))
  }

  async fn scan_folder_subdirs(&self, folder: &FolderId, subdirs: &[String]) -> Result<ScanSummary, FolderError> {
    self.record(ModelCall::Scan(subdirs.to_vec()));
    if let Some(delay) = self.scan_delay {
      tokio::time::sleep(delay).await;
    }

    let next = self.scans.lock().unwrap().pop_front();
    let result = next.unwrap_or_else(|| Ok(ScanSummary::default()));
    if let Err(err) = &result
      && let Some(tracker) = self.tracker(folder)
    {
      tracker.set_error(err).await;
    }
    result
  }
}

/// A send-only folder on `model`, not yet serving
pub fn send_only_folder(
  model: &Arc<MockModel>,
  rescan_interval_s: u64,
) -> (SendOnlyFolder, Arc<StateTracker>, CancellationToken) {
  let mut config = FolderConfig::new("test-folder", "/nonexistent/test-folder");
  config.rescan_interval_s = rescan_interval_s;

  let state = model.add_folder(config.clone());
  let cancel = CancellationToken::new();
  let model: Arc<dyn FolderModel> = model.clone();
  let folder = SendOnlyFolder::new(FolderContext {
    config,
    model,
    state: Arc::clone(&state),
    cancel: cancel.clone(),
  });

  (folder, state, cancel)
}

pub fn paused_error() -> FolderError {
  FolderError::Unhealthy(HealthError::Paused)
}

pub fn walk_error() -> FolderError {
  FolderError::Walk {
    path: "/nonexistent/test-folder".into(),
    message: "permission denied".to_string(),
  }
}

/// Poll `condition` every 10ms (virtual time under a paused clock) until it
/// holds or `timeout` elapses.
pub async fn wait_for<F>(mut condition: F, timeout: Duration) -> bool
where
  F: FnMut() -> bool,
{
  let start = tokio::time::Instant::now();
  while start.elapsed() < timeout {
    if condition() {
      return true;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  condition()
}
