//! Folder handles for communicating with folder services
//!
//! Handles are cheap to clone and provide the request/response side of a
//! folder service: on-demand scans, delay overrides and shutdown.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{message::ScanRequest, scanner::ScanChannels};
use crate::{
  domain::folder::FolderId,
  model::{FolderError, ScanSummary},
};

/// Handle to communicate with a folder service
#[derive(Clone, Debug)]
pub struct FolderHandle {
  id: FolderId,
  now_tx: mpsc::Sender<ScanRequest>,
  delay_tx: mpsc::UnboundedSender<Duration>,
  cancel: CancellationToken,
}

impl FolderHandle {
  pub fn new(id: FolderId, channels: ScanChannels, cancel: CancellationToken) -> Self {
    Self {
      id,
      now_tx: channels.now_tx,
      delay_tx: channels.delay_tx,
      cancel,
    }
  }

  pub fn id(&self) -> &FolderId {
    &self.id
  }

  /// Scan now, restricted to `subdirs` (empty = whole folder), and wait
  /// for the result.
  ///
  /// Requests queue behind a scan that is already running. The folder's
  /// health is not checked first. Fails with `ServiceStopped` if the
  /// service is gone or shuts down before answering.
  pub async fn scan(&self, subdirs: Vec<String>) -> Result<ScanSummary, FolderError> {
    if self.cancel.is_cancelled() {
      return Err(FolderError::ServiceStopped);
    }

    let (req, rx) = ScanRequest::new(subdirs);
    self.now_tx.send(req).await.map_err(|_| FolderError::ServiceStopped)?;
    rx.await.map_err(|_| FolderError::ServiceStopped)?
  }

  /// Move the next periodic scan to `next` from now
  pub fn delay(&self, next: Duration) -> Result<(), FolderError> {
    self.delay_tx.send(next).map_err(|_| FolderError::ServiceStopped)
  }

  /// Stop the service. Idempotent; there is no restarting a stopped service.
  pub fn stop(&self) {
    self.cancel.cancel();
  }

  pub fn is_stopped(&self) -> bool {
    self.cancel.is_cancelled()
  }
}
