//! Message types for folder services
//!
//! On-demand scans are the only request a folder service accepts. Each
//! request carries a oneshot reply, which the service answers exactly once
//! before handling its next event.

use tokio::sync::oneshot;

use crate::model::{FolderError, ScanSummary};

/// Result delivered to an on-demand scan requester
pub type ScanResult = Result<ScanSummary, FolderError>;

/// An on-demand scan request
#[derive(Debug)]
pub struct ScanRequest {
  /// Restrict the scan to these folder-relative paths (empty = whole folder)
  pub subdirs: Vec<String>,
  /// Single-use response slot
  pub reply: oneshot::Sender<ScanResult>,
}

impl ScanRequest {
  /// Create a request and the receiver its result will arrive on
  pub fn new(subdirs: Vec<String>) -> (Self, oneshot::Receiver<ScanResult>) {
    let (reply, rx) = oneshot::channel();
    (Self { subdirs, reply }, rx)
  }

  /// Answer the request, consuming it.
  ///
  /// Returns false if the requester stopped waiting.
  pub fn respond(self, result: ScanResult) -> bool {
    self.reply.send(result).is_ok()
  }
}
