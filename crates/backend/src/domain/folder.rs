use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a synchronized folder, unique within the process.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

impl FolderId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for FolderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for FolderId {
  fn from(s: &str) -> Self {
    Self(s.to_string())
  }
}

impl From<String> for FolderId {
  fn from(s: String) -> Self {
    Self(s)
  }
}

/// Folder variant, used as the key of the service constructor registry.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FolderType {
  /// Scan and announce local changes, never apply remote ones
  #[default]
  SendOnly,
  SendReceive,
  ReceiveOnly,
}

impl fmt::Display for FolderType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      FolderType::SendOnly => "sendonly",
      FolderType::SendReceive => "sendreceive",
      FolderType::ReceiveOnly => "receiveonly",
    };
    f.write_str(name)
  }
}

/// Status-reporting state of a folder.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FolderState {
  #[default]
  Idle,
  Scanning,
  Error,
}

impl fmt::Display for FolderState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      FolderState::Idle => "idle",
      FolderState::Scanning => "scanning",
      FolderState::Error => "error",
    };
    f.write_str(name)
  }
}

/// Snapshot of a folder's state for status consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderStatus {
  pub id: FolderId,
  pub state: FolderState,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  pub changed_at: DateTime<Utc>,
}

/// Published whenever a folder's state or recorded error changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateChanged {
  pub folder: FolderId,
  pub from: FolderState,
  pub to: FolderState,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  pub at: DateTime<Utc>,
}
