//! Health check command

use std::path::Path;

use anyhow::{Context, Result};
use foldersync::check_health;

use super::{find_folder, load_config};

/// Check a folder can be scanned; fails with the reason if not
pub async fn cmd_check(folder: &str, config_path: Option<&Path>) -> Result<()> {
  let config = load_config(config_path)?;
  let folder = find_folder(&config, folder)?;

  check_health(folder).with_context(|| format!("Folder {} is not healthy", folder.description()))?;

  println!("Folder {} is healthy", folder.description());
  Ok(())
}
