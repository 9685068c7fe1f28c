//! Directory walk for a folder scan.
//!
//! Uses the `ignore` crate's walker with all of its git handling switched
//! off; the only ignore rules come from a `.stignore` file in the folder
//! root, matched with a `Gitignore` built from that file.

use std::{
  path::{Component, Path},
  sync::Arc,
};

use ignore::{
  WalkBuilder,
  gitignore::{Gitignore, GitignoreBuilder},
};
use tracing::{debug, trace, warn};

use super::{FileRecord, FolderError};

/// Name of the per-folder ignore file
pub const IGNORE_FILE: &str = ".stignore";

/// Names reserved for bookkeeping, never reported as folder content
const INTERNAL_NAMES: &[&str] = &[".stfolder", IGNORE_FILE, ".stversions"];

/// Clean up a list of requested subdirectories.
///
/// Returns an empty list when the whole folder should be scanned. Nested
/// entries are dropped in favor of their ancestors.
pub fn normalize_subdirs(subdirs: &[String]) -> Result<Vec<String>, FolderError> {
  let mut cleaned: Vec<String> = Vec::with_capacity(subdirs.len());

  for raw in subdirs {
    let path = Path::new(raw);
    if path.is_absolute() || raw.starts_with('/') || raw.starts_with('\\') {
      return Err(FolderError::InvalidSubdir {
        path: raw.clone(),
        reason: "must be relative to the folder root",
      });
    }

    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
      match component {
        Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        Component::CurDir => {}
        Component::ParentDir => {
          return Err(FolderError::InvalidSubdir {
            path: raw.clone(),
            reason: "must not contain '..'",
          });
        }
        Component::RootDir | Component::Prefix(_) => {
          return Err(FolderError::InvalidSubdir {
            path: raw.clone(),
            reason: "must be relative to the folder root",
          });
        }
      }
    }

    if parts.is_empty() {
      // "" or "." means the whole folder
      return Ok(Vec::new());
    }
    cleaned.push(parts.join("/"));
  }

  cleaned.sort();
  cleaned.dedup();

  // Sorted order puts ancestors first, so one pass drops nested entries
  let mut unified: Vec<String> = Vec::with_capacity(cleaned.len());
  for sub in cleaned {
    let nested = unified
      .iter()
      .any(|parent| sub.starts_with(parent.as_str()) && sub.as_bytes().get(parent.len()) == Some(&b'/'));
    if !nested {
      unified.push(sub);
    }
  }

  Ok(unified)
}

/// Whether a folder-relative path names an internal file or lives under one
fn is_internal(relative: &str, marker_name: &str) -> bool {
  let first = relative.split('/').next().unwrap_or(relative);
  first == marker_name || INTERNAL_NAMES.contains(&first)
}

/// Folder-relative path with `/` separators
fn relative_path(root: &Path, path: &Path) -> Option<String> {
  let rel = path.strip_prefix(root).ok()?;
  let parts: Vec<String> = rel
    .components()
    .filter_map(|c| match c {
      Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
      _ => None,
    })
    .collect();
  Some(parts.join("/"))
}

fn build_ignore(root: &Path) -> Option<Gitignore> {
  let ignore_path = root.join(IGNORE_FILE);
  if !ignore_path.exists() {
    return None;
  }

  let mut builder = GitignoreBuilder::new(root);
  if let Some(err) = builder.add(&ignore_path) {
    warn!(path = %ignore_path.display(), error = %err, "Error parsing ignore file, continuing with partial rules");
  }

  match builder.build() {
    Ok(gitignore) => Some(gitignore),
    Err(e) => {
      warn!(path = %ignore_path.display(), error = %e, "Failed to build ignore matcher, ignoring nothing");
      None
    }
  }
}

/// Walk `root` (or only `subdirs` under it) and collect folder entries.
///
/// `subdirs` must already be normalized. Requested subdirectories that do not
/// exist contribute nothing. Fails only if the folder root itself cannot be
/// read; unreadable entries below it are logged and skipped.
pub fn walk_folder(root: &Path, subdirs: &[String], marker_name: &str) -> Result<Vec<(String, FileRecord)>, FolderError> {
  std::fs::read_dir(root).map_err(|e| FolderError::Walk {
    path: root.to_path_buf(),
    message: e.to_string(),
  })?;

  let ignore = build_ignore(root).map(Arc::new);
  let starts: Vec<std::path::PathBuf> = if subdirs.is_empty() {
    vec![root.to_path_buf()]
  } else {
    subdirs.iter().map(|sub| root.join(sub)).collect()
  };

  let mut entries = Vec::new();
  for start in starts {
    if std::fs::symlink_metadata(&start).is_err() {
      debug!(path = %start.display(), "Requested subdirectory does not exist");
      continue;
    }
    // The walker never filters its own starting entry
    if let Some(gi) = &ignore
      && gi.matched_path_or_any_parents(&start, start.is_dir()).is_ignore()
    {
      debug!(path = %start.display(), "Requested subdirectory is ignored");
      continue;
    }

    let filter_ignore = ignore.clone();
    let walker = WalkBuilder::new(&start)
      .standard_filters(false)
      .follow_links(false)
      .filter_entry(move |entry| match &filter_ignore {
        Some(gi) => {
          let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
          // A scan may start below an ignored directory, so parents count too
          !gi.matched_path_or_any_parents(entry.path(), is_dir).is_ignore()
        }
        None => true,
      })
      .build();

    for result in walker {
      let entry = match result {
        Ok(entry) => entry,
        Err(e) => {
          warn!(root = %root.display(), error = %e, "Skipping unreadable entry");
          continue;
        }
      };

      let Some(relative) = relative_path(root, entry.path()) else {
        continue;
      };
      if relative.is_empty() || is_internal(&relative, marker_name) {
        continue;
      }

      let metadata = match entry.metadata() {
        Ok(metadata) => metadata,
        Err(e) => {
          warn!(path = %entry.path().display(), error = %e, "Skipping entry without metadata");
          continue;
        }
      };

      let record = if metadata.is_dir() {
        FileRecord::dir()
      } else {
        FileRecord::file(metadata.len(), metadata.modified().ok())
      };
      trace!(path = %relative, "Observed entry");
      entries.push((relative, record));
    }
  }

  Ok(entries)
}
