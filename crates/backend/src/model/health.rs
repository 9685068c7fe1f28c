use std::path::PathBuf;

use crate::domain::config::FolderConfig;

/// Reasons a folder cannot currently be synchronized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HealthError {
  #[error("Folder is paused")]
  Paused,

  #[error("Folder path missing: {}", .0.display())]
  PathMissing(PathBuf),

  #[error("Folder path is not a directory: {}", .0.display())]
  NotADirectory(PathBuf),

  #[error("Folder marker missing: {}", .0.display())]
  MarkerMissing(PathBuf),

  #[error("Folder path unreadable: {}: {message}", path.display())]
  Unreadable { path: PathBuf, message: String },
}

/// Check whether a folder is synchronizable.
///
/// The folder must not be paused, its path must be an existing directory and
/// the marker file must be present in its root. A missing marker usually
/// means an unmounted volume, which would otherwise look like every file
/// was deleted.
pub fn check_health(config: &FolderConfig) -> Result<(), HealthError> {
  if config.paused {
    return Err(HealthError::Paused);
  }

  let metadata = match std::fs::metadata(&config.path) {
    Ok(metadata) => metadata,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      return Err(HealthError::PathMissing(config.path.clone()));
    }
    Err(e) => {
      return Err(HealthError::Unreadable {
        path: config.path.clone(),
        message: e.to_string(),
      });
    }
  };

  if !metadata.is_dir() {
    return Err(HealthError::NotADirectory(config.path.clone()));
  }

  let marker = config.marker_path();
  if !marker.exists() {
    return Err(HealthError::MarkerMissing(marker));
  }

  Ok(())
}
