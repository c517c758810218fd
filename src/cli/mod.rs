//! CLI module
//!
//! Command-line interface for maintaining and serving the mirror.
//!
//! # Commands
//!
//! - `server [port]` - Serve the snapshot over HTTP
//! - `update [key]` - Refresh every known endpoint
//! - `updatesome <key> <names...>` - Refresh selected endpoints
//! - `updateconstant [doc_url]` - Refresh the list of endpoint names
//! - `reinstall [key] [doc_url]` - Purge, refresh names, update everything
//! - `purge` - Delete every cached endpoint

mod commands;
mod runner;
mod server;

pub use commands::{normalize_args, Cli, Commands};
pub use runner::{Runner, CONSTANTS_UPDATED, PURGED};
pub use server::{router, serve, ServerConfig, UNKNOWN_ENDPOINT_BODY};
