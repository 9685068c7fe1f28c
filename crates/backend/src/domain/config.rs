//! Configuration for the folder daemon.
//!
//! Config is read from `~/.config/foldersync/config.toml` (or an explicit
//! path given on the command line). Every section has defaults, so an empty
//! file is a valid config with no folders.

use std::{
  collections::HashSet,
  path::{Path, PathBuf},
  time::Duration,
};

use serde::{Deserialize, Serialize};

use super::folder::{FolderId, FolderType};

// ============================================================================
// Folder Configuration
// ============================================================================

/// Configuration of a single synchronized folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderConfig {
  /// Unique folder identifier
  pub id: FolderId,

  /// Human readable label (optional)
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub label: String,

  /// Folder root on the local filesystem
  pub path: PathBuf,

  /// Folder variant: "sendonly", "sendreceive" or "receiveonly"
  #[serde(rename = "type", default)]
  pub folder_type: FolderType,

  /// Seconds between periodic rescans (0 = only scan on request)
  /// Default: 3600
  #[serde(default = "default_rescan_interval_s")]
  pub rescan_interval_s: u64,

  /// Paused folders never pass the health check
  #[serde(default)]
  pub paused: bool,

  /// Marker file that must exist in the folder root for it to be healthy
  /// Default: ".stfolder"
  #[serde(default = "default_marker_name")]
  pub marker_name: String,
}

/// Longest accepted rescan interval (one year)
pub const MAX_RESCAN_INTERVAL_S: u64 = 365 * 24 * 3600;

fn default_rescan_interval_s() -> u64 {
  3600
}
fn default_marker_name() -> String {
  ".stfolder".to_string()
}

impl FolderConfig {
  /// Create a send-only folder config with default settings
  pub fn new(id: impl Into<FolderId>, path: impl Into<PathBuf>) -> Self {
    Self {
      id: id.into(),
      label: String::new(),
      path: path.into(),
      folder_type: FolderType::default(),
      rescan_interval_s: default_rescan_interval_s(),
      paused: false,
      marker_name: default_marker_name(),
    }
  }

  /// Human readable description used in log lines
  pub fn description(&self) -> String {
    if self.label.is_empty() {
      self.id.to_string()
    } else {
      format!("\"{}\" ({})", self.label, self.id)
    }
  }

  pub fn rescan_interval(&self) -> Duration {
    Duration::from_secs(self.rescan_interval_s)
  }

  pub fn marker_path(&self) -> PathBuf {
    self.path.join(&self.marker_name)
  }
}

// ============================================================================
// Daemon Configuration
// ============================================================================

/// Daemon lifecycle and logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
  /// Log level: "off", "error", "warn", "info", "debug", "trace"
  /// Default: "info"
  #[serde(default = "default_log_level")]
  pub log_level: String,

  /// Log file rotation: "daily", "hourly", "never"
  /// Default: "daily"
  #[serde(default = "default_log_rotation")]
  pub log_rotation: String,

  /// Upper bound for on-demand scan requests issued through the supervisor
  /// (0 = wait indefinitely)
  /// Default: 0
  #[serde(default)]
  pub scan_timeout_secs: u64,
}

fn default_log_level() -> String {
  "info".to_string()
}
fn default_log_rotation() -> String {
  "daily".to_string()
}

impl Default for DaemonConfig {
  fn default() -> Self {
    Self {
      log_level: default_log_level(),
      log_rotation: default_log_rotation(),
      scan_timeout_secs: 0,
    }
  }
}

impl DaemonConfig {
  pub fn scan_timeout(&self) -> Option<Duration> {
    (self.scan_timeout_secs > 0).then(|| Duration::from_secs(self.scan_timeout_secs))
  }
}

// ============================================================================
// Main Configuration
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Failed to parse config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
  #[error("Folder id must not be empty")]
  EmptyId,
  #[error("Folder {0} has no path")]
  EmptyPath(FolderId),
  #[error("Folder {0} is configured more than once")]
  DuplicateFolder(FolderId),
  #[error("Folder {folder} rescan interval {interval_s}s exceeds the maximum of {max_s}s")]
  RescanIntervalTooLong { folder: FolderId, interval_s: u64, max_s: u64 },
}

/// Complete daemon configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  pub daemon: DaemonConfig,
  #[serde(rename = "folder")]
  pub folders: Vec<FolderConfig>,
}

impl Config {
  /// Load and validate config from an explicit path
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    config.validate()?;
    Ok(config)
  }

  /// Load the user config if one exists, otherwise defaults
  pub fn load_default() -> Result<Self, ConfigError> {
    let path = Self::user_config_path();
    if path.exists() { Self::load(&path) } else { Ok(Self::default()) }
  }

  /// Get the user-level config path
  pub fn user_config_path() -> PathBuf {
    crate::dirs::config_file_path()
  }

  /// Write the config template to `path` unless a file is already there.
  ///
  /// Returns true if the template was written. Nothing is logged, so callers
  /// can report the outcome once their logging is set up.
  pub fn write_template_if_missing(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
      return Ok(false);
    }
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Self::generate_template())?;
    Ok(true)
  }

  /// Check folder ids are present and unique, and every folder has a path
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for folder in &self.folders {
      if folder.id.as_str().trim().is_empty() {
        return Err(ConfigError::EmptyId);
      }
      if folder.path.as_os_str().is_empty() {
        return Err(ConfigError::EmptyPath(folder.id.clone()));
      }
      if folder.rescan_interval_s > MAX_RESCAN_INTERVAL_S {
        return Err(ConfigError::RescanIntervalTooLong {
          folder: folder.id.clone(),
          interval_s: folder.rescan_interval_s,
          max_s: MAX_RESCAN_INTERVAL_S,
        });
      }
      if !seen.insert(&folder.id) {
        return Err(ConfigError::DuplicateFolder(folder.id.clone()));
      }
    }
    Ok(())
  }

  pub fn folder(&self, id: &FolderId) -> Option<&FolderConfig> {
    self.folders.iter().find(|f| &f.id == id)
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    r#"# foldersync configuration

[daemon]
# Log level: off, error, warn, info, debug, trace
log_level = "info"
# Log file rotation: daily, hourly, never
log_rotation = "daily"
# Seconds to wait for an on-demand scan before giving up (0 = no limit)
scan_timeout_secs = 0

# One [[folder]] table per synchronized folder.
#
# [[folder]]
# id = "abcd-1234"
# label = "Documents"
# path = "/home/me/Documents"
# type = "sendonly"
# # Seconds between rescans, at most one year; 0 scans only on request
# rescan_interval_s = 3600
# paused = false
# marker_name = ".stfolder"
"#
    .to_string()
  }
}
