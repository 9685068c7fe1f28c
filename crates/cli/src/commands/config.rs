//! Config commands

use std::path::Path;

use anyhow::{Context, Result, bail};
use foldersync::config::Config;

use super::load_config;

/// Write the default config template to the user config path
pub async fn cmd_config_init(force: bool) -> Result<()> {
  let config_path = Config::user_config_path();

  if config_path.exists() && !force {
    bail!(
      "Config file already exists: {}\nUse --force to overwrite it",
      config_path.display()
    );
  }

  if let Some(parent) = config_path.parent() {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("Failed to create {}", parent.display()))?;
  }

  tokio::fs::write(&config_path, Config::generate_template())
    .await
    .with_context(|| format!("Failed to write {}", config_path.display()))?;

  println!("Created user config: {}", config_path.display());
  println!("Add a [[folder]] table per folder to synchronize.");
  Ok(())
}

/// Print the effective configuration as JSON
pub async fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
  let config = load_config(config_path)?;
  println!("{}", serde_json::to_string_pretty(&config)?);
  Ok(())
}
