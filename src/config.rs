//! Application configuration
//!
//! Everything is optional: a missing file or a missing field falls back to
//! the defaults below, and command-line arguments override both.
//!
//! ```yaml
//! api:
//!   base_url: https://api.hypixel.net
//!   key: 00000000-0000-0000-0000-000000000000
//!   key_placement:
//!     location: header
//!     name: API-Key
//!   rate_limit:
//!     requests_per_minute: 120
//!     burst_size: 20
//! paths:
//!   snapshot_dir: endpoints
//!   backup_dir: endpoints_old
//!   constants: constants.json
//! updater:
//!   minimum_limit_left: 10
//!   default_uuid: b876ec32e396476ba1158438d83c67d4
//!   max_concurrency: 8
//!   key_check:
//!     kind: key_info
//! ```

use crate::auth::{Credential, KeyPlacement};
use crate::constants::SyncSettings;
use crate::error::{Error, Result};
use crate::fetcher::DEFAULT_API_BASE;
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::snapshot::{SnapshotPaths, UpdaterConfigBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote API access
    pub api: ApiConfig,

    /// Filesystem locations
    pub paths: PathsConfig,

    /// Update behaviour
    pub updater: UpdaterConfigBuilder,

    /// Constant synchronization sources
    pub sync: SyncSettings,

    /// Static server
    pub server: ServerSettings,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&contents)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Remote API access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL of the API
    pub base_url: String,

    /// API key, used when none is given on the command line
    pub key: Option<Credential>,

    /// Where the key is attached
    pub key_placement: KeyPlacement,

    /// User agent sent with every request
    pub user_agent: Option<String>,

    /// Request timeout in seconds; none by default
    pub timeout_secs: Option<u64>,

    /// Client-side pacing of requests
    pub rate_limit: Option<RateLimiterConfig>,

    /// Log the cause of failed fetches
    pub diagnostics: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            key: None,
            key_placement: KeyPlacement::default(),
            user_agent: None,
            timeout_secs: None,
            rate_limit: None,
            diagnostics: false,
        }
    }
}

impl ApiConfig {
    /// HTTP client settings for API requests
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().base_url(&self.base_url);
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(rate_limit) = &self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        builder.build()
    }
}

/// Filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Snapshot directory
    pub snapshot_dir: PathBuf,

    /// Backup directory used during updates
    pub backup_dir: PathBuf,

    /// Constants file
    pub constants: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let snapshot = SnapshotPaths::default();
        Self {
            snapshot_dir: snapshot.snapshot_dir,
            backup_dir: snapshot.backup_dir,
            constants: PathBuf::from("constants.json"),
        }
    }
}

impl PathsConfig {
    /// Snapshot and backup directories
    pub fn snapshot_paths(&self) -> SnapshotPaths {
        SnapshotPaths::new(&self.snapshot_dir, &self.backup_dir)
    }
}

/// Static server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Port used when none is given on the command line
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 80 }
    }
}
