//! Authentication module
//!
//! The mirrored API authenticates with a single API key, sent either as a
//! header or as a query parameter depending on the API version.
//! [`KeyValidator`] confirms the key works before any bulk update starts.

mod types;
mod validator;

pub use types::{ApiKeyAuth, Credential, KeyPlacement};
pub use validator::{redact_key, KeyCheck, KeyValidator, DEFAULT_MINUTE_LIMIT};

#[cfg(test)]
mod tests;
