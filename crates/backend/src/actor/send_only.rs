//! SendOnlyFolder - folder service that scans and reports, never pulls
//!
//! # Event loop
//!
//! One event per iteration, from one of four sources:
//!
//! - shutdown: stop the scan timer and return
//! - scan timer: health check, full scan, reschedule
//! - on-demand request: scan the requested subdirectories, answer the caller
//! - delay override: re-arm the scan timer
//!
//! Shutdown is checked before every wait, so queued events are dropped once
//! it has fired. The other three sources are raced without bias. A running
//! scan is never interrupted; requests arriving meanwhile wait their turn.

use std::fmt;

use futures::future::BoxFuture;
use tracing::{debug, info};

use super::{
  folder::{FolderBase, FolderContext, FolderService},
  handle::FolderHandle,
  message::ScanRequest,
};
use crate::{
  domain::folder::FolderId,
  model::{FolderError, ScanSummary},
};

/// What a periodic tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
  /// Folder unhealthy, nothing scanned
  Skipped(FolderError),
  /// The scan ran and failed
  Failed(FolderError),
  /// The scan succeeded; `first` on the first success since the loop started
  Scanned { summary: ScanSummary, first: bool },
}

#[derive(Debug)]
pub struct SendOnlyFolder {
  pub(super) base: FolderBase,
}

impl SendOnlyFolder {
  pub fn new(ctx: FolderContext) -> Self {
    Self {
      base: FolderBase::new(ctx),
    }
  }

  /// Constructor registered for `FolderType::SendOnly`
  pub fn factory(ctx: FolderContext) -> Box<dyn FolderService> {
    Box::new(Self::new(ctx))
  }

  /// Main event loop, returns once shutdown has fired
  pub(super) async fn run(&mut self) {
    debug!(folder = %self, "starting");

    let mut initial_scan_completed = false;
    loop {
      if self.base.cancel.is_cancelled() {
        break;
      }

      tokio::select! {
        _ = self.base.cancel.cancelled() => break,

        _ = self.base.scan.timer.fired() => {
          self.handle_tick(&mut initial_scan_completed).await;
        }

        Some(req) = self.base.scan.now_rx.recv() => {
          self.handle_scan_request(req).await;
        }

        Some(next) = self.base.scan.delay_rx.recv() => {
          self.base.scan.timer.reset(next);
        }
      }
    }

    self.base.scan.stop();
    debug!(folder = %self, "exiting");
  }

  /// Periodic scan: skip unhealthy folders, scan the whole folder otherwise
  pub(super) async fn handle_tick(&mut self, initial_scan_completed: &mut bool) -> TickOutcome {
    if let Err(err) = self.base.model.check_folder_health(&self.base.id).await {
      info!(
        folder = %self.base.description(),
        error = %err,
        "Skipping scan of folder due to folder error"
      );
      self.base.scan.reschedule();
      return TickOutcome::Skipped(err);
    }

    debug!(folder = %self, "rescan");

    let summary = match self.base.model.scan_folder_subdirs(&self.base.id, &[]).await {
      Ok(summary) => summary,
      Err(err) => {
        // The model may already have recorded this error while scanning;
        // the tracker drops the repeat
        self.base.set_error(&err).await;
        self.base.scan.reschedule();
        return TickOutcome::Failed(err);
      }
    };

    let first = !*initial_scan_completed;
    if first {
      info!(folder = %self.base.description(), "Completed initial scan (send-only) of folder");
      *initial_scan_completed = true;
    }

    if !self.base.scan.has_no_interval() {
      self.base.scan.reschedule();
    }

    TickOutcome::Scanned { summary, first }
  }

  /// On-demand scan: no health check, the result goes back to the caller
  pub(super) async fn handle_scan_request(&mut self, req: ScanRequest) {
    let result = self.base.model.scan_folder_subdirs(&self.base.id, &req.subdirs).await;
    if !req.respond(result) {
      debug!(folder = %self, "Scan requester went away before the result");
    }
  }
}

impl FolderService for SendOnlyFolder {
  fn id(&self) -> &FolderId {
    self.base.id()
  }

  fn handle(&self) -> FolderHandle {
    self.base.handle()
  }

  fn serve(mut self: Box<Self>) -> BoxFuture<'static, ()> {
    Box::pin(async move { self.run().await })
  }
}

impl fmt::Display for SendOnlyFolder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "sendOnlyFolder/{}", self.base.id)
  }
}
