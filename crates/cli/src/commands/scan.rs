//! Scan command

use std::path::Path;

use anyhow::{Context, Result};
use foldersync::{FolderModel, LocalModel};

use super::{find_folder, load_config};

/// Scan a folder once, optionally restricted to subdirectories, and print
/// the summary as JSON
pub async fn cmd_scan(folder: &str, subdirs: Vec<String>, config_path: Option<&Path>) -> Result<()> {
  let config = load_config(config_path)?;
  let folder = find_folder(&config, folder)?.clone();
  let id = folder.id.clone();

  let model = LocalModel::new();
  model.add_folder(folder);

  model
    .check_folder_health(&id)
    .await
    .with_context(|| format!("Folder {id} is not healthy"))?;
  let summary = model
    .scan_folder_subdirs(&id, &subdirs)
    .await
    .with_context(|| format!("Failed to scan folder {id}"))?;

  println!("{}", serde_json::to_string_pretty(&summary)?);
  Ok(())
}
