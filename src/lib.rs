// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # api-mirror
//!
//! Mirrors the Hypixel public API onto the local filesystem and serves the
//! cached copies over HTTP.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use api_mirror::auth::{Credential, KeyPlacement};
//! use api_mirror::fetcher::EndpointFetcher;
//! use api_mirror::http::HttpClientConfig;
//! use api_mirror::snapshot::{SnapshotPaths, SnapshotUpdater, UpdaterConfig};
//!
//! #[tokio::main]
//! async fn main() -> api_mirror::Result<()> {
//!     let fetcher = EndpointFetcher::new(
//!         HttpClientConfig::default(),
//!         Credential::new("00000000-0000-0000-0000-000000000000"),
//!         KeyPlacement::default(),
//!     )?;
//!     let updater = SnapshotUpdater::new(
//!         fetcher,
//!         SnapshotPaths::default(),
//!         UpdaterConfig::builder().build(),
//!     );
//!
//!     let report = updater.update_endpoints(["player", "guild/find"]).await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                            CLI                               │
//! │  server  update  updatesome  updateconstant  reinstall  purge│
//! └──────────────────────────────────────────────────────────────┘
//!          │                    │                      │
//! ┌────────┴──────┐   ┌─────────┴─────────┐   ┌────────┴────────┐
//! │ Static server │   │ Snapshot Updater  │   │ Constant Sync   │
//! │ (axum)        │   │ backup, fetch × N │   │ tree API / HTML │
//! └───────────────┘   └─────────┬─────────┘   └─────────────────┘
//!                     ┌─────────┴─────────┐
//!                     │ Key Validator     │
//!                     │ Endpoint Fetcher  │
//!                     │ Parameter Resolver│
//!                     └───────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Endpoint names and shared aliases
pub mod types;

/// Query parameter resolution
pub mod params;

/// HTTP client with rate limiting
pub mod http;

/// Credentials and key validation
pub mod auth;

/// Endpoint fetching
pub mod fetcher;

/// Snapshot directory maintenance
pub mod snapshot;

/// Endpoint-name list and its synchronization
pub mod constants;

/// Application configuration
pub mod config;

/// Command-line interface and static server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use constants::{ConstantSynchronizer, ConstantsFile};
pub use fetcher::{EndpointFetcher, EndpointSource};
pub use params::QueryParams;
pub use snapshot::{SnapshotPaths, SnapshotUpdater};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
