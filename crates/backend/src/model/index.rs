//! In-memory index of the last scanned folder contents.

use std::{collections::BTreeMap, time::SystemTime};

use super::ScanSummary;

/// What the index remembers about a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
  pub is_dir: bool,
  pub size: u64,
  pub modified: Option<SystemTime>,
}

impl FileRecord {
  pub fn file(size: u64, modified: Option<SystemTime>) -> Self {
    Self {
      is_dir: false,
      size,
      modified,
    }
  }

  pub fn dir() -> Self {
    Self {
      is_dir: true,
      size: 0,
      modified: None,
    }
  }
}

/// Folder-relative path (with `/` separators) to record.
#[derive(Debug, Default)]
pub struct FolderIndex {
  records: BTreeMap<String, FileRecord>,
}

/// Whether `path` lies inside one of the scope entries (empty scope = everything)
fn in_scope(path: &str, scope: &[String]) -> bool {
  scope.is_empty()
    || scope.iter().any(|sub| {
      path == sub || (path.len() > sub.len() && path.starts_with(sub.as_str()) && path.as_bytes()[sub.len()] == b'/')
    })
}

impl FolderIndex {
  pub fn new() -> Self {
    Self::default()
  }

  /// Indexed paths in sorted order
  pub fn paths(&self) -> Vec<String> {
    self.records.keys().cloned().collect()
  }

  /// Merge the result of a walk restricted to `scope` into the index.
  ///
  /// Only records inside the scope are compared; in-scope records that the
  /// walk did not observe are removed as deleted.
  pub fn apply(&mut self, scope: &[String], observed: Vec<(String, FileRecord)>) -> ScanSummary {
    let mut summary = ScanSummary {
      scanned: observed.len(),
      ..ScanSummary::default()
    };

    let mut seen = BTreeMap::new();
    for (path, record) in observed {
      match self.records.get(&path) {
        None => summary.added += 1,
        Some(existing) if *existing != record => summary.changed += 1,
        Some(_) => {}
      }
      seen.insert(path, record);
    }

    let before = self.records.len();
    self
      .records
      .retain(|path, _| !in_scope(path, scope) || seen.contains_key(path));
    summary.deleted = before - self.records.len();

    self.records.extend(seen);
    summary
  }
}
