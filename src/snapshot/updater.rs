//! Snapshot updater
//!
//! Runs one update pass: back up, recreate, validate the key, create
//! folders, fetch and write every endpoint, drop the backup.

use super::config::UpdaterConfig;
use super::paths::SnapshotPaths;
use crate::auth::KeyValidator;
use crate::constants::ConstantsFile;
use crate::error::{Error, Result};
use crate::fetcher::EndpointSource;
use crate::types::{EndpointName, EndpointSet};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of a successful update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Number of endpoint files written
    pub written: usize,
    /// Whether a previous snapshot was backed up and then discarded
    pub replaced_previous: bool,
    /// When the update finished
    pub completed_at: DateTime<Utc>,
}

impl std::fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Success, all {} endpoints updated and written.",
            self.written
        )
    }
}

/// Rebuilds the snapshot directory from the remote API
pub struct SnapshotUpdater<S> {
    source: S,
    paths: SnapshotPaths,
    config: UpdaterConfig,
}

impl<S: EndpointSource> SnapshotUpdater<S> {
    /// Create an updater writing to `paths`
    pub fn new(source: S, paths: SnapshotPaths, config: UpdaterConfig) -> Self {
        Self {
            source,
            paths,
            config,
        }
    }

    /// The endpoint source used for fetching
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The directories this updater works on
    pub fn paths(&self) -> &SnapshotPaths {
        &self.paths
    }

    /// The updater's settings
    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Update every endpoint listed in a constants file
    pub async fn update_all(&self, constants: &ConstantsFile) -> Result<UpdateReport> {
        self.update_endpoints(&constants.endpoints).await
    }

    /// Replace the snapshot with freshly fetched copies of `names`.
    ///
    /// Duplicates are collapsed. On failure the snapshot keeps whatever was
    /// already written and the backup directory is left in place.
    pub async fn update_endpoints<I, N>(&self, names: I) -> Result<UpdateReport>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let set = EndpointSet::from_names(names.into_iter().map(|n| n.as_ref().to_string()))?;
        info!("Updating {} endpoints", set.len());

        let replaced_previous = self.backup().await?;
        tokio::fs::create_dir_all(&self.paths.snapshot_dir).await?;

        KeyValidator::new(
            &self.source,
            self.config.key_check(),
            self.config.minimum_limit_left(),
        )
        .check_key(set.len())
        .await?;

        self.create_folders(&set).await?;

        let failed = self.write_endpoints(&set).await;
        if !failed.is_empty() {
            warn!(
                "{} of {} endpoints failed; backup kept at {}",
                failed.len(),
                set.len(),
                self.paths.backup_dir.display()
            );
            return Err(Error::PartialUpdate { failed });
        }

        if replaced_previous {
            tokio::fs::remove_dir_all(&self.paths.backup_dir).await?;
            debug!("Removed backup {}", self.paths.backup_dir.display());
        }

        let report = UpdateReport {
            written: set.len(),
            replaced_previous,
            completed_at: Utc::now(),
        };
        info!("{}", report);
        Ok(report)
    }

    /// Move the current snapshot out of the way. Returns whether there was
    /// one to move.
    async fn backup(&self) -> Result<bool> {
        let backup_dir = &self.paths.backup_dir;
        if tokio::fs::try_exists(backup_dir).await.unwrap_or(true) {
            return Err(Error::BackupConflict {
                path: backup_dir.display().to_string(),
            });
        }
        if !tokio::fs::try_exists(&self.paths.snapshot_dir).await? {
            debug!(
                "No snapshot at {}, skipping backup",
                self.paths.snapshot_dir.display()
            );
            return Ok(false);
        }

        tokio::fs::rename(&self.paths.snapshot_dir, backup_dir)
            .await
            .map_err(|e| {
                warn!("Backup rename failed: {}", e);
                Error::BackupFailed {
                    path: backup_dir.display().to_string(),
                    message: e.to_string(),
                }
            })?;
        debug!("Backed up snapshot to {}", backup_dir.display());
        Ok(true)
    }

    /// Pre-create folders for nested names, all at once
    async fn create_folders(&self, set: &EndpointSet) -> Result<()> {
        let root = &self.paths.snapshot_dir;
        let creations = set.parent_folders().into_iter().map(|folder| async move {
            let path = root.join(folder);
            match tokio::fs::create_dir_all(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
                Err(e) => Err(format!("{}: {e}", path.display())),
            }
        });

        let errors: Vec<String> = futures::future::join_all(creations)
            .await
            .into_iter()
            .filter_map(std::result::Result::err)
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::folder_creation(errors.join("; ")))
        }
    }

    /// Fetch and write every endpoint; returns the names that failed, in set order
    async fn write_endpoints(&self, set: &EndpointSet) -> Vec<String> {
        let limit = self
            .config
            .max_concurrency()
            .map_or(set.len().max(1), std::num::NonZeroUsize::get);

        let mut outcomes: Vec<(usize, bool)> = stream::iter(set.iter().enumerate())
            .map(|(index, name)| async move {
                let ok = match self.write_endpoint(name).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Endpoint '{}' not updated: {}", name, e);
                        false
                    }
                };
                (index, ok)
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        outcomes.sort_unstable_by_key(|(index, _)| *index);
        let names: Vec<&EndpointName> = set.iter().collect();
        outcomes
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(index, _)| names[index].to_string())
            .collect()
    }

    async fn write_endpoint(&self, name: &EndpointName) -> Result<()> {
        let fetched = self
            .source
            .fetch(name.as_str(), self.config.default_params())
            .await?;

        let path = name.file_path(&self.paths.snapshot_dir);
        ensure_parent(&path).await?;
        tokio::fs::write(&path, fetched.body.as_bytes()).await?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}
