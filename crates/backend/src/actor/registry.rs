//! Folder constructor registry.
//!
//! Maps each folder type to the constructor of its service, so the
//! supervisor can start any folder without knowing the concrete variants.
//! Built once on first use and read-only afterwards.

use std::{collections::HashMap, sync::LazyLock};

use super::{
  folder::{FolderContext, FolderService},
  send_only::SendOnlyFolder,
};
use crate::domain::folder::FolderType;

/// Builds a folder service from its context
pub type FolderFactory = fn(FolderContext) -> Box<dyn FolderService>;

static FOLDER_FACTORIES: LazyLock<HashMap<FolderType, FolderFactory>> = LazyLock::new(|| {
  let mut factories: HashMap<FolderType, FolderFactory> = HashMap::new();
  factories.insert(FolderType::SendOnly, SendOnlyFolder::factory);
  factories
});

/// Constructor for a folder type, if that type is supported
pub fn factory_for(folder_type: FolderType) -> Option<FolderFactory> {
  FOLDER_FACTORIES.get(&folder_type).copied()
}
