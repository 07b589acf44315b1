//! File snapshot store for scalpel.
//!
//! Snapshots are flat, byte-identical sibling copies of a target file,
//! named by timestamp (plus an optional tag) inside a per-directory backup
//! folder. The store creates, lists, prunes, resolves, and restores them;
//! restoring first snapshots the current state so it is itself undoable.
//!
//! # Example
//!
//! ```no_run
//! use scalpel_core::config::BackupConfig;
//! use scalpel_snapshot::SnapshotStore;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), scalpel_snapshot::SnapshotError> {
//! let store = SnapshotStore::new(BackupConfig {
//!     enabled: true,
//!     dir: ".aibackup".to_string(),
//!     max_backups: 20,
//! });
//!
//! let file = Path::new("notes.txt");
//! store.save(file, Some("before-refactor"))?;
//!
//! // ... edit the file ...
//!
//! store.restore(file, Some("before-refactor"))?;
//! # Ok(())
//! # }
//! ```

mod error;
mod store;

pub use error::{SnapshotError, SnapshotResult};
pub use store::{SnapshotEntry, SnapshotStore};
