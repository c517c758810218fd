//! Snapshot and backup locations, and the purge operation

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the snapshot and its backup live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPaths {
    /// Snapshot directory
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    /// Backup directory used during updates
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("endpoints")
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("endpoints_old")
}

impl Default for SnapshotPaths {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            backup_dir: default_backup_dir(),
        }
    }
}

impl SnapshotPaths {
    /// Explicit snapshot and backup directories
    pub fn new(snapshot_dir: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// `endpoints/` and `endpoints_old/` under `root`
    pub fn under(root: &Path) -> Self {
        Self::new(root.join(default_snapshot_dir()), root.join(default_backup_dir()))
    }

    /// Delete the snapshot directory (if any) and recreate it empty.
    ///
    /// The backup directory is left alone.
    pub async fn remove_all(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.snapshot_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tokio::fs::create_dir_all(&self.snapshot_dir).await?;
        info!("Purged {}", self.snapshot_dir.display());
        Ok(())
    }
}
