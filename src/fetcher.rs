//! Endpoint fetching
//!
//! [`EndpointFetcher`] performs one authenticated GET per endpoint and parses
//! the body as JSON. Every failure, whatever its cause, reaches the caller as
//! [`Error::ServiceUnavailable`]; the cause is only logged when diagnostics
//! are enabled.

use crate::auth::{ApiKeyAuth, Credential, KeyPlacement};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::params::QueryParams;
use crate::types::JsonValue;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Default root of the mirrored API
pub const DEFAULT_API_BASE: &str = "https://api.hypixel.net";

/// A fetched endpoint: the body exactly as received plus its parsed form
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedEndpoint {
    /// Raw response text
    pub body: String,
    /// Parsed JSON
    pub value: JsonValue,
}

impl FetchedEndpoint {
    /// Parse a body, keeping the original text
    pub fn parse(body: String) -> Result<Self> {
        let value = serde_json::from_str(&body)?;
        Ok(Self { body, value })
    }

    /// The `success` flag of the response, false when absent
    pub fn is_success(&self) -> bool {
        self.value
            .get("success")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }
}

/// Anything that can produce endpoint data
#[async_trait]
pub trait EndpointSource: Send + Sync {
    /// Fetch one endpoint with the given parameters
    async fn fetch(&self, name: &str, params: &QueryParams) -> Result<FetchedEndpoint>;
}

/// Fetches endpoints from the remote API
#[derive(Debug)]
pub struct EndpointFetcher {
    client: HttpClient,
    diagnostics: bool,
}

impl EndpointFetcher {
    /// Create a fetcher that sends `credential` with every request
    pub fn new(
        config: HttpClientConfig,
        credential: Credential,
        placement: KeyPlacement,
    ) -> Result<Self> {
        let mut config = config;
        if config.base_url.is_none() {
            config.base_url = Some(DEFAULT_API_BASE.to_string());
        }
        let client = HttpClient::with_auth(config, ApiKeyAuth::new(credential, placement))?;
        Ok(Self {
            client,
            diagnostics: false,
        })
    }

    /// Log the underlying cause of failed fetches
    #[must_use]
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    async fn fetch_inner(&self, name: &str, params: &QueryParams) -> Result<FetchedEndpoint> {
        let resolved = params
            .resolve()
            .ok_or_else(|| Error::invalid_params(params.to_string()))?;

        let url = if resolved.is_empty() {
            name.to_string()
        } else {
            format!("{name}?{resolved}")
        };

        let body = self.client.get_text(&url).await?;
        FetchedEndpoint::parse(body)
    }
}

#[async_trait]
impl EndpointSource for EndpointFetcher {
    async fn fetch(&self, name: &str, params: &QueryParams) -> Result<FetchedEndpoint> {
        match self.fetch_inner(name, params).await {
            Ok(fetched) => {
                debug!("Fetched endpoint '{}' ({} bytes)", name, fetched.body.len());
                Ok(fetched)
            }
            Err(e) => {
                if self.diagnostics {
                    warn!("Fetching endpoint '{}' failed: {}", name, e);
                }
                Err(Error::ServiceUnavailable)
            }
        }
    }
}
