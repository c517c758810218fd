//! Error types for api-mirror
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for api-mirror
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Input Validation Errors
    // ============================================================================
    #[error("Invalid parameters: {input}")]
    InvalidParams { input: String },

    #[error("Invalid endpoint name '{name}': {reason}")]
    InvalidEndpointName { name: String, reason: String },

    #[error("Bad parameter(s) provided: {message}")]
    BadParameter { message: String },

    #[error("No API key provided (pass it as an argument or set api.key in the config file)")]
    MissingKey,

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ============================================================================
    // Remote Service Errors
    // ============================================================================
    #[error("The API is currently down, or something went wrong.")]
    ServiceUnavailable,

    #[error("Invalid Key!")]
    InvalidKey,

    #[error(
        "Refusing to proceed: {planned} requests with {used} already used this minute \
         would leave at most {remaining} of {limit} (minimum left: {minimum})"
    )]
    RateLimitBudget {
        limit: i64,
        used: i64,
        planned: i64,
        remaining: i64,
        minimum: i64,
    },

    #[error("Invalid documentation tree: {message}")]
    InvalidTree { message: String },

    #[error("No endpoints found")]
    NoEndpoints,

    #[error("Documentation specification block not found: {message}")]
    SpecNotFound { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Filesystem Errors
    // ============================================================================
    #[error(
        "Error occurred whilst trying to make a backup of the endpoints cache at {path}. \
         Manual cleanup required: try deleting it."
    )]
    BackupConflict { path: String },

    #[error("Could not move the endpoints cache to {path}: {message}")]
    BackupFailed { path: String, message: String },

    #[error("Encountered an error whilst creating folders for endpoints: {message}")]
    FolderCreation { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Batch Errors
    // ============================================================================
    #[error("Some endpoints couldn't be updated/written: {}", failed.join(", "))]
    PartialUpdate { failed: Vec<String> },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameters error
    pub fn invalid_params(input: impl Into<String>) -> Self {
        Self::InvalidParams {
            input: input.into(),
        }
    }

    /// Create an invalid endpoint name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpointName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a bad parameter error
    pub fn bad_parameter(message: impl Into<String>) -> Self {
        Self::BadParameter {
            message: message.into(),
        }
    }

    /// Create an invalid tree error
    pub fn invalid_tree(message: impl Into<String>) -> Self {
        Self::InvalidTree {
            message: message.into(),
        }
    }

    /// Create a spec-not-found error
    pub fn spec_not_found(message: impl Into<String>) -> Self {
        Self::SpecNotFound {
            message: message.into(),
        }
    }

    /// Create a folder creation error
    pub fn folder_creation(message: impl Into<String>) -> Self {
        Self::FolderCreation {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Whether the error was caused by bad user input rather than by the
    /// remote service or the filesystem
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidParams { .. }
                | Error::InvalidEndpointName { .. }
                | Error::BadParameter { .. }
                | Error::MissingKey
                | Error::Config { .. }
        )
    }
}

/// Result type alias for api-mirror
pub type Result<T> = std::result::Result<T, Error>;
