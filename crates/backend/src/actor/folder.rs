//! Scaffolding shared by every folder variant.
//!
//! A variant embeds a [`FolderBase`] (identity, scanner, shutdown token,
//! model and state tracker) and supplies its own event loop. The periodic
//! scan branch of that loop is where variants that also pull changes add
//! their extra steps.

use std::{fmt, sync::Arc};

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::{handle::FolderHandle, scanner::FolderScanner};
use crate::{
  domain::{config::FolderConfig, folder::FolderId},
  model::{FolderError, FolderModel, StateTracker},
};

/// Everything a folder constructor receives
pub struct FolderContext {
  pub config: FolderConfig,
  pub model: Arc<dyn FolderModel>,
  pub state: Arc<StateTracker>,
  /// Fires when the service must stop
  pub cancel: CancellationToken,
}

impl fmt::Debug for FolderContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FolderContext")
      .field("config", &self.config)
      .field("cancel", &self.cancel.is_cancelled())
      .finish_non_exhaustive()
  }
}

/// A long-lived per-folder service.
pub trait FolderService: Send {
  fn id(&self) -> &FolderId;

  /// Handle for requests to this service; valid before and while serving
  fn handle(&self) -> FolderHandle;

  /// Run until the service's cancellation token fires
  fn serve(self: Box<Self>) -> BoxFuture<'static, ()>;
}

/// Fields and behavior shared by folder variants
pub struct FolderBase {
  pub(super) id: FolderId,
  description: String,
  pub(super) scan: FolderScanner,
  pub(super) model: Arc<dyn FolderModel>,
  pub(super) state: Arc<StateTracker>,
  pub(super) cancel: CancellationToken,
  handle: FolderHandle,
}

impl FolderBase {
  pub fn new(ctx: FolderContext) -> Self {
    let (scan, channels) = FolderScanner::new(ctx.config.rescan_interval());
    let handle = FolderHandle::new(ctx.config.id.clone(), channels, ctx.cancel.clone());

    Self {
      id: ctx.config.id.clone(),
      description: ctx.config.description(),
      scan,
      model: ctx.model,
      state: ctx.state,
      cancel: ctx.cancel,
      handle,
    }
  }

  pub fn id(&self) -> &FolderId {
    &self.id
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn handle(&self) -> FolderHandle {
    self.handle.clone()
  }

  /// Record a folder error; repeats of the current error are dropped
  pub async fn set_error(&self, err: &FolderError) {
    self.state.set_error(err).await;
  }
}

impl fmt::Debug for FolderBase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FolderBase")
      .field("id", &self.id)
      .field("description", &self.description)
      .field("scan", &self.scan)
      .finish_non_exhaustive()
  }
}
