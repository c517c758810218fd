//! Tests for the snapshot updater and purge

use super::*;
use crate::auth::KeyCheck;
use crate::constants::ConstantsFile;
use crate::error::{Error, Result};
use crate::fetcher::{EndpointSource, FetchedEndpoint};
use crate::params::QueryParams;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::tempdir;

// ============================================================================
// Simulated API
// ============================================================================

/// In-memory API: known endpoints answer with their body, others fail
#[derive(Default)]
struct FakeApi {
    bodies: HashMap<String, String>,
    key_valid: bool,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    seen_params: Mutex<Vec<Option<String>>>,
}

impl FakeApi {
    fn new(endpoints: &[(&str, &str)]) -> Self {
        let mut bodies: HashMap<String, String> = endpoints
            .iter()
            .map(|(name, body)| ((*name).to_string(), (*body).to_string()))
            .collect();
        bodies
            .entry("player".to_string())
            .or_insert_with(|| r#"{"success":true,"player":{}}"#.to_string());
        Self {
            bodies,
            key_valid: true,
            ..Default::default()
        }
    }

    fn with_invalid_key(mut self) -> Self {
        self.key_valid = false;
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl EndpointSource for FakeApi {
    async fn fetch(&self, name: &str, params: &QueryParams) -> Result<FetchedEndpoint> {
        let is_key_check = params.resolve().as_deref() == Some("uuid=f7c77d999f154a66a87dc4a51ef30d19");
        if is_key_check {
            let body = if self.key_valid {
                r#"{"success":true}"#
            } else {
                r#"{"success":false,"cause":"Invalid API key"}"#
            };
            return FetchedEndpoint::parse(body.to_string());
        }

        self.seen_params.lock().unwrap().push(params.resolve());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.bodies.get(name) {
            Some(body) => FetchedEndpoint::parse(body.clone()),
            None => Err(Error::ServiceUnavailable),
        }
    }
}

fn updater(api: FakeApi, root: &Path) -> SnapshotUpdater<FakeApi> {
    SnapshotUpdater::new(api, SnapshotPaths::under(root), UpdaterConfig::default())
}

async fn write_file(path: &Path, contents: &str) {
    tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    tokio::fs::write(path, contents).await.unwrap();
}

fn dir_is_empty(path: &Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_updater_config_defaults() {
    let config = UpdaterConfig::default();
    assert_eq!(config.minimum_limit_left(), 0);
    assert_eq!(config.default_uuid(), DEFAULT_UUID);
    assert_eq!(config.default_profile(), DEFAULT_UUID);
    assert!(config.max_concurrency().is_none());
    assert_eq!(config.key_check(), &KeyCheck::default());
}

#[test]
fn test_default_params_derived_from_fields() {
    let config = UpdaterConfig::builder()
        .default_uuid("u1")
        .default_auction_page(4)
        .build();

    assert_eq!(config.default_profile(), "u1");
    assert_eq!(
        config.default_params().resolve().unwrap(),
        "uuid=u1&profile=u1&page=4&byUuid=u1&player=u1"
    );

    let config = UpdaterConfig::builder()
        .default_uuid("u1")
        .default_profile("p9")
        .build();
    assert_eq!(
        config.default_params().resolve().unwrap(),
        "uuid=u1&profile=p9&page=0&byUuid=u1&player=u1"
    );
}

#[test]
fn test_zero_concurrency_means_unbounded() {
    let config = UpdaterConfig::builder().max_concurrency(0).build();
    assert!(config.max_concurrency().is_none());

    let config = UpdaterConfig::builder().max_concurrency(3).build();
    assert_eq!(config.max_concurrency().map(std::num::NonZeroUsize::get), Some(3));
}

// ============================================================================
// Update Tests
// ============================================================================

#[tokio::test]
async fn test_update_writes_exact_bodies_for_nested_names() {
    let tmp = tempdir().unwrap();
    let player = r#"{"success":true,"player":{"displayname":"Technoblade"}}"#;
    let guild = r#"{"success":true,"guild":"5eba1c5f8ea8c960a61f38ed"}"#;
    let api = FakeApi::new(&[("player", player), ("guild/find", guild)]);
    let updater = updater(api, tmp.path());

    let report = updater
        .update_endpoints(["player", "guild/find"])
        .await
        .unwrap();

    assert_eq!(report.written, 2);
    assert!(!report.replaced_previous);

    let snapshot = &updater.paths().snapshot_dir;
    assert_eq!(
        tokio::fs::read_to_string(snapshot.join("player.json")).await.unwrap(),
        player
    );
    assert_eq!(
        tokio::fs::read_to_string(snapshot.join("guild").join("find.json"))
            .await
            .unwrap(),
        guild
    );
    assert!(!updater.paths().backup_dir.exists());
}

#[tokio::test]
async fn test_update_replaces_previous_snapshot() {
    let tmp = tempdir().unwrap();
    let paths = SnapshotPaths::under(tmp.path());
    write_file(&paths.snapshot_dir.join("stale.json"), "{}").await;

    let api = FakeApi::new(&[("boosters", r#"{"success":true,"boosters":[]}"#)]);
    let updater = updater(api, tmp.path());

    let report = updater
        .update_endpoints(["boosters", "boosters", "player"])
        .await
        .unwrap();

    assert_eq!(report.written, 2);
    assert!(report.replaced_previous);
    assert_eq!(report.to_string(), "Success, all 2 endpoints updated and written.");

    assert!(paths.snapshot_dir.join("boosters.json").exists());
    assert!(paths.snapshot_dir.join("player.json").exists());
    assert!(!paths.snapshot_dir.join("stale.json").exists());
    assert!(!paths.backup_dir.exists());
}

#[tokio::test]
async fn test_update_sends_default_params() {
    let tmp = tempdir().unwrap();
    let api = FakeApi::new(&[("skyblock/auctions", r#"{"success":true}"#)]);
    let updater = SnapshotUpdater::new(
        api,
        SnapshotPaths::under(tmp.path()),
        UpdaterConfig::builder().default_uuid("abc").build(),
    );

    updater.update_endpoints(["skyblock/auctions"]).await.unwrap();

    let seen = updater.source().seen_params.lock().unwrap();
    assert_eq!(
        seen.as_slice(),
        &[Some("uuid=abc&profile=abc&page=0&byUuid=abc&player=abc".to_string())]
    );
}

#[tokio::test]
async fn test_invalid_key_leaves_empty_snapshot_and_backup() {
    let tmp = tempdir().unwrap();
    let paths = SnapshotPaths::under(tmp.path());
    write_file(&paths.snapshot_dir.join("player.json"), r#"{"old":true}"#).await;

    let api = FakeApi::new(&[]).with_invalid_key();
    let updater = updater(api, tmp.path());

    let err = updater.update_endpoints(["player"]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidKey));

    // No rollback: the fresh snapshot stays empty and the backup holds the old data
    assert!(dir_is_empty(&paths.snapshot_dir));
    assert_eq!(
        tokio::fs::read_to_string(paths.backup_dir.join("player.json"))
            .await
            .unwrap(),
        r#"{"old":true}"#
    );
}

#[tokio::test]
async fn test_failed_backup_rename_reports_cause() {
    let tmp = tempdir().unwrap();
    let paths = SnapshotPaths::new(
        tmp.path().join("endpoints"),
        tmp.path().join("missing").join("endpoints_old"),
    );
    write_file(&paths.snapshot_dir.join("player.json"), "{}").await;

    let updater = SnapshotUpdater::new(FakeApi::new(&[]), paths.clone(), UpdaterConfig::default());
    let err = updater.update_endpoints(["player"]).await.unwrap_err();

    match &err {
        Error::BackupFailed { path, message } => {
            assert!(path.ends_with("endpoints_old"));
            assert!(!message.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!err.to_string().contains("Manual cleanup"));
    assert!(paths.snapshot_dir.join("player.json").exists());
}

#[tokio::test]
async fn test_stale_backup_blocks_update() {
    let tmp = tempdir().unwrap();
    let paths = SnapshotPaths::under(tmp.path());
    write_file(&paths.snapshot_dir.join("player.json"), "{}").await;
    tokio::fs::create_dir_all(&paths.backup_dir).await.unwrap();

    let updater = updater(FakeApi::new(&[]), tmp.path());
    let err = updater.update_endpoints(["player"]).await.unwrap_err();

    assert!(matches!(err, Error::BackupConflict { .. }));
    // Nothing was touched
    assert!(paths.snapshot_dir.join("player.json").exists());
    assert!(dir_is_empty(&paths.backup_dir));
}

#[tokio::test]
async fn test_invalid_name_aborts_before_touching_disk() {
    let tmp = tempdir().unwrap();
    let paths = SnapshotPaths::under(tmp.path());
    write_file(&paths.snapshot_dir.join("player.json"), "{}").await;

    let updater = updater(FakeApi::new(&[]), tmp.path());
    let err = updater
        .update_endpoints(["player", "../escape"])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidEndpointName { .. }));
    assert!(paths.snapshot_dir.join("player.json").exists());
    assert!(!paths.backup_dir.exists());
}

#[tokio::test]
async fn test_partial_failure_reports_failed_names_and_keeps_backup() {
    let tmp = tempdir().unwrap();
    let paths = SnapshotPaths::under(tmp.path());
    write_file(&paths.snapshot_dir.join("old.json"), "{}").await;

    let api = FakeApi::new(&[("boosters", r#"{"success":true}"#)]);
    let updater = updater(api, tmp.path());

    let err = updater
        .update_endpoints(["missing/one", "boosters", "missing_two"])
        .await
        .unwrap_err();

    match err {
        Error::PartialUpdate { failed } => {
            assert_eq!(failed, vec!["missing/one".to_string(), "missing_two".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Successful writes are not reverted
    assert!(paths.snapshot_dir.join("boosters.json").exists());
    assert!(paths.snapshot_dir.join("missing").is_dir());
    assert!(paths.backup_dir.join("old.json").exists());
}

#[tokio::test]
async fn test_folder_creation_failure() {
    let tmp = tempdir().unwrap();
    let paths = SnapshotPaths::under(tmp.path());

    // A file where the snapshot's parent folder would have to go
    struct ClobberingApi {
        inner: FakeApi,
        snapshot_dir: std::path::PathBuf,
    }

    #[async_trait]
    impl EndpointSource for ClobberingApi {
        async fn fetch(&self, name: &str, params: &QueryParams) -> Result<FetchedEndpoint> {
            let fetched = self.inner.fetch(name, params).await?;
            // Runs during the key check, after the snapshot was recreated
            tokio::fs::write(self.snapshot_dir.join("guild"), b"not a folder")
                .await
                .unwrap();
            Ok(fetched)
        }
    }

    let api = ClobberingApi {
        inner: FakeApi::new(&[("guild/find", "{}")]),
        snapshot_dir: paths.snapshot_dir.clone(),
    };
    let updater = SnapshotUpdater::new(api, paths.clone(), UpdaterConfig::default());

    let err = updater.update_endpoints(["guild/find"]).await.unwrap_err();
    assert!(matches!(err, Error::FolderCreation { .. }));
}

#[tokio::test]
async fn test_existing_folders_are_tolerated() {
    let tmp = tempdir().unwrap();
    let api = FakeApi::new(&[
        ("skyblock/auctions", "{}"),
        ("skyblock/bazaar", "{}"),
        ("skyblock/news", "{}"),
    ]);
    let updater = updater(api, tmp.path());

    updater
        .update_endpoints(["skyblock/auctions", "skyblock/bazaar", "skyblock/news"])
        .await
        .unwrap();

    let snapshot = &updater.paths().snapshot_dir;
    for name in ["auctions", "bazaar", "news"] {
        assert!(snapshot.join("skyblock").join(format!("{name}.json")).exists());
    }
}

#[tokio::test]
async fn test_max_concurrency_bounds_in_flight_fetches() {
    let tmp = tempdir().unwrap();
    let names: Vec<String> = (0..8).map(|i| format!("endpoint{i}")).collect();
    let endpoints: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "{}")).collect();
    let api = FakeApi::new(&endpoints).with_delay(Duration::from_millis(20));

    let updater = SnapshotUpdater::new(
        api,
        SnapshotPaths::under(tmp.path()),
        UpdaterConfig::builder().max_concurrency(2).build(),
    );
    updater.update_endpoints(&names).await.unwrap();

    assert!(updater.source().peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_unbounded_fetches_run_together() {
    let tmp = tempdir().unwrap();
    let names: Vec<String> = (0..6).map(|i| format!("endpoint{i}")).collect();
    let endpoints: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "{}")).collect();
    let api = FakeApi::new(&endpoints).with_delay(Duration::from_millis(50));

    let updater = updater(api, tmp.path());
    updater.update_endpoints(&names).await.unwrap();

    assert_eq!(updater.source().peak.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_update_all_uses_constants() {
    let tmp = tempdir().unwrap();
    let api = FakeApi::new(&[("counts", "{}"), ("leaderboards", "{}")]);
    let updater = updater(api, tmp.path());

    let constants = ConstantsFile::new(vec!["counts".to_string(), "leaderboards".to_string()]);
    let report = updater.update_all(&constants).await.unwrap();

    assert_eq!(report.written, 2);
    assert!(updater.paths().snapshot_dir.join("leaderboards.json").exists());
}

// ============================================================================
// Purge Tests
// ============================================================================

#[tokio::test]
async fn test_remove_all_twice_leaves_empty_dir() {
    let tmp = tempdir().unwrap();
    let paths = SnapshotPaths::under(tmp.path());
    write_file(&paths.snapshot_dir.join("guild").join("find.json"), "{}").await;
    tokio::fs::create_dir_all(&paths.backup_dir).await.unwrap();

    paths.remove_all().await.unwrap();
    assert!(paths.snapshot_dir.is_dir());
    assert!(dir_is_empty(&paths.snapshot_dir));

    paths.remove_all().await.unwrap();
    assert!(paths.snapshot_dir.is_dir());
    assert!(dir_is_empty(&paths.snapshot_dir));

    // Backup untouched
    assert!(paths.backup_dir.is_dir());
}

#[tokio::test]
async fn test_remove_all_without_existing_snapshot() {
    let tmp = tempdir().unwrap();
    let paths = SnapshotPaths::new(tmp.path().join("cache"), tmp.path().join("cache_old"));

    paths.remove_all().await.unwrap();
    assert!(dir_is_empty(&paths.snapshot_dir));
}
