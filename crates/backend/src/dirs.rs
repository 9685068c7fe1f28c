//! Where foldersync keeps its config and its daemon log.
//!
//! Each directory comes from the first of: an explicit override variable,
//! the XDG base directory with an app subdirectory, or the platform default
//! with an app subdirectory.

use std::{ffi::OsString, path::PathBuf};

/// Subdirectory created under XDG and platform base directories
pub const APP_DIR: &str = "foldersync";

/// Name of the daemon log file (before rotation suffixes)
pub const LOG_FILE: &str = "foldersync.log";

/// Name of the user config file
pub const CONFIG_FILE: &str = "config.toml";

/// Pick a directory by precedence. Empty variables count as unset.
fn resolve(explicit: Option<OsString>, xdg: Option<OsString>, platform: Option<PathBuf>) -> PathBuf {
  let set = |value: Option<OsString>| value.filter(|v| !v.is_empty());

  if let Some(dir) = set(explicit) {
    return PathBuf::from(dir);
  }
  if let Some(base) = set(xdg) {
    return PathBuf::from(base).join(APP_DIR);
  }
  platform.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

/// Base directory for foldersync data (log files).
///
/// `DATA_DIR`, then `XDG_DATA_HOME/foldersync`, then the platform's local
/// data directory.
pub fn default_data_dir() -> PathBuf {
  resolve(
    std::env::var_os("DATA_DIR"),
    std::env::var_os("XDG_DATA_HOME"),
    dirs::data_local_dir(),
  )
}

/// Directory holding the user config.
///
/// `CONFIG_DIR`, then `XDG_CONFIG_HOME/foldersync`, then the platform's
/// config directory.
pub fn default_config_dir() -> PathBuf {
  resolve(
    std::env::var_os("CONFIG_DIR"),
    std::env::var_os("XDG_CONFIG_HOME"),
    dirs::config_dir(),
  )
}

pub fn config_file_path() -> PathBuf {
  default_config_dir().join(CONFIG_FILE)
}

pub fn log_file_path() -> PathBuf {
  default_data_dir().join(LOG_FILE)
}
