//! Folder listing command

use std::path::Path;

use anyhow::Result;
use foldersync::{
  check_health,
  config::FolderConfig,
  folder::{FolderId, FolderType},
};
use serde::Serialize;

use super::load_config;

#[derive(Debug, Serialize)]
struct FolderListing<'a> {
  id: &'a FolderId,
  #[serde(skip_serializing_if = "str::is_empty")]
  label: &'a str,
  path: &'a Path,
  #[serde(rename = "type")]
  folder_type: FolderType,
  rescan_interval_s: u64,
  healthy: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<String>,
}

impl<'a> FolderListing<'a> {
  fn new(folder: &'a FolderConfig) -> Self {
    let error = check_health(folder).err().map(|e| e.to_string());
    Self {
      id: &folder.id,
      label: &folder.label,
      path: &folder.path,
      folder_type: folder.folder_type,
      rescan_interval_s: folder.rescan_interval_s,
      healthy: error.is_none(),
      error,
    }
  }
}

/// Print every configured folder with its health as JSON
pub async fn cmd_folders(config_path: Option<&Path>) -> Result<()> {
  let config = load_config(config_path)?;
  let listings: Vec<FolderListing<'_>> = config.folders.iter().map(FolderListing::new).collect();

  println!("{}", serde_json::to_string_pretty(&listings)?);
  Ok(())
}
