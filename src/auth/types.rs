//! Credential types

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

/// Opaque API key. Never printed in full.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for attaching to requests
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

/// Where the API key goes on each request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "location", rename_all = "snake_case")]
pub enum KeyPlacement {
    /// Place in HTTP header
    Header {
        #[serde(default = "default_header_name")]
        name: String,
    },
    /// Place in query parameter
    Query {
        #[serde(default = "default_query_param")]
        param: String,
    },
}

fn default_header_name() -> String {
    "API-Key".to_string()
}

fn default_query_param() -> String {
    "key".to_string()
}

impl Default for KeyPlacement {
    fn default() -> Self {
        Self::Header {
            name: default_header_name(),
        }
    }
}

/// API key authentication applied to outbound requests
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    credential: Credential,
    placement: KeyPlacement,
}

impl ApiKeyAuth {
    /// Create from a credential and its placement
    pub fn new(credential: Credential, placement: KeyPlacement) -> Self {
        Self {
            credential,
            placement,
        }
    }

    /// Attach the key to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.placement {
            KeyPlacement::Header { name } => req.header(name.as_str(), self.credential.expose()),
            KeyPlacement::Query { param } => {
                req.query(&[(param.as_str(), self.credential.expose())])
            }
        }
    }
}
