//! Snapshot management
//!
//! The snapshot directory mirrors every fetched endpoint as one JSON file.
//! An update renames the current snapshot to a backup directory, rebuilds
//! the snapshot from scratch and removes the backup once every endpoint was
//! written.
//!
//! # Failure behaviour
//!
//! Failed updates are not rolled back. The snapshot is left with whatever
//! was written before the failure and the backup directory stays in place,
//! which blocks further updates until it is removed by hand.
//!
//! ```text
//! endpoints/            # snapshot
//! ├── player.json
//! └── guild/
//!     └── find.json
//! endpoints_old/        # only while an update runs, or after one failed
//! ```

mod config;
mod paths;
mod updater;

pub use config::{UpdaterConfig, UpdaterConfigBuilder, DEFAULT_UUID};
pub use paths::SnapshotPaths;
pub use updater::{SnapshotUpdater, UpdateReport};

#[cfg(test)]
mod tests;
