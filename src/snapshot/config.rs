//! Updater configuration

use crate::auth::KeyCheck;
use crate::params::QueryParams;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Player whose stats are fetched by default; has data for nearly every endpoint
pub const DEFAULT_UUID: &str = "b876ec32e396476ba1158438d83c67d4";

/// Immutable settings of a [`SnapshotUpdater`](super::SnapshotUpdater).
///
/// Build it with [`UpdaterConfig::builder`]; `default_params` is derived at
/// build time and cannot drift from the fields it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    minimum_limit_left: i64,
    default_uuid: String,
    default_profile: String,
    max_concurrency: Option<NonZeroUsize>,
    key_check: KeyCheck,
    default_params: QueryParams,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl UpdaterConfig {
    /// Create a new config builder
    pub fn builder() -> UpdaterConfigBuilder {
        UpdaterConfigBuilder::default()
    }

    /// Budget floor that must remain after a batch
    pub fn minimum_limit_left(&self) -> i64 {
        self.minimum_limit_left
    }

    /// Player UUID used for player-scoped endpoints
    pub fn default_uuid(&self) -> &str {
        &self.default_uuid
    }

    /// Profile UUID used for profile-scoped endpoints
    pub fn default_profile(&self) -> &str {
        &self.default_profile
    }

    /// Cap on simultaneous fetches, unbounded when `None`
    pub fn max_concurrency(&self) -> Option<NonZeroUsize> {
        self.max_concurrency
    }

    /// Key validation strategy
    pub fn key_check(&self) -> &KeyCheck {
        &self.key_check
    }

    /// Parameters sent with every endpoint fetch
    pub fn default_params(&self) -> &QueryParams {
        &self.default_params
    }
}

/// Builder for [`UpdaterConfig`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfigBuilder {
    minimum_limit_left: i64,
    default_uuid: Option<String>,
    default_profile: Option<String>,
    default_auction_page: u32,
    max_concurrency: Option<usize>,
    key_check: KeyCheck,
}

impl UpdaterConfigBuilder {
    /// Set the budget floor
    pub fn minimum_limit_left(mut self, value: i64) -> Self {
        self.minimum_limit_left = value;
        self
    }

    /// Set the default player UUID
    pub fn default_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.default_uuid = Some(uuid.into());
        self
    }

    /// Set the default profile UUID
    pub fn default_profile(mut self, profile: impl Into<String>) -> Self {
        self.default_profile = Some(profile.into());
        self
    }

    /// Set the default auction page
    pub fn default_auction_page(mut self, page: u32) -> Self {
        self.default_auction_page = page;
        self
    }

    /// Bound simultaneous fetches; zero means unbounded
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }

    /// Set the key validation strategy
    pub fn key_check(mut self, check: KeyCheck) -> Self {
        self.key_check = check;
        self
    }

    /// Build the config
    pub fn build(self) -> UpdaterConfig {
        let default_uuid = self
            .default_uuid
            .unwrap_or_else(|| DEFAULT_UUID.to_string());
        let default_profile = self
            .default_profile
            .unwrap_or_else(|| default_uuid.clone());

        let default_params = QueryParams::mapping([
            ("uuid", default_uuid.clone()),
            ("profile", default_profile.clone()),
            ("page", self.default_auction_page.to_string()),
            // findGuild
            ("byUuid", default_uuid.clone()),
            // guild
            ("player", default_uuid.clone()),
        ]);

        UpdaterConfig {
            minimum_limit_left: self.minimum_limit_left,
            default_uuid,
            default_profile,
            max_concurrency: self.max_concurrency.and_then(NonZeroUsize::new),
            key_check: self.key_check,
            default_params,
        }
    }
}
