//! Folder services and their scheduling
//!
//! Each synchronized folder runs as a long-lived task with its own event
//! loop. Nothing is shared between folders; callers talk to a folder through
//! its [`FolderHandle`], and the loop owns its timer and channels.
//!
//! # Components
//!
//! - [`FolderScanner`]: rescan timer, on-demand request queue, delay overrides
//! - [`SendOnlyFolder`]: the scan-and-report folder service
//! - [`registry`]: folder type to constructor mapping
//! - [`FolderSupervisor`]: starts and stops services through the registry
//!
//! # Message Flow
//!
//! ```text
//! caller -> FolderHandle --now--> folder loop -> FolderModel (scan)
//!                  |                   ^    \
//!                  +------delay--------+     +--oneshot--> caller
//! ```

mod folder;
mod handle;
mod message;
pub mod registry;
mod scanner;
mod send_only;
mod supervisor;


pub use folder::{FolderBase, FolderContext, FolderService};
pub use handle::FolderHandle;
pub use message::{ScanRequest, ScanResult};
pub use scanner::{FolderScanner, ScanChannels, ScanTimer};
pub use send_only::{SendOnlyFolder, TickOutcome};
pub use supervisor::{FolderSupervisor, SupervisorError};
