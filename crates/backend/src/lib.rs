mod actor;
mod model;

mod domain;
pub use domain::{config, folder};

pub mod dirs;

mod daemon;
pub use actor::{
  FolderBase, FolderContext, FolderHandle, FolderScanner, FolderService, FolderSupervisor, ScanChannels, ScanRequest,
  ScanResult, ScanTimer, SendOnlyFolder, SupervisorError, TickOutcome, registry,
};
pub use daemon::Daemon;
pub use model::{
  FileRecord, FolderError, FolderIndex, FolderModel, HealthError, LocalModel, ScanSummary, StateTracker, check_health,
  normalize_subdirs, walk_folder,
};
