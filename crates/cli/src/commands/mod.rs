//! CLI command implementations

use std::path::Path;

use anyhow::{Context, Result};
use foldersync::{
  config::{Config, FolderConfig},
  folder::FolderId,
};

mod check;
mod config;
mod daemon;
mod folders;
mod scan;

pub use check::cmd_check;
pub use config::{cmd_config_init, cmd_config_show};
pub use daemon::cmd_daemon;
pub use folders::cmd_folders;
pub use scan::cmd_scan;

/// Load the config at `path`, or the user config when none is given
pub fn load_config(path: Option<&Path>) -> Result<Config> {
  match path {
    Some(path) => Config::load(path).with_context(|| format!("Failed to load config {}", path.display())),
    None => Config::load_default().context("Failed to load user config"),
  }
}

/// Look up a configured folder by id
fn find_folder<'a>(config: &'a Config, id: &str) -> Result<&'a FolderConfig> {
  config
    .folder(&FolderId::from(id))
    .with_context(|| format!("Folder {id} is not configured"))
}
