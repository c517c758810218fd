//! Key validation
//!
//! One cheap request tells whether the key is accepted, and for the key-info
//! check, whether enough of the per-minute budget is left for the planned
//! batch.

use crate::error::{Error, Result};
use crate::fetcher::EndpointSource;
use crate::params::QueryParams;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Requests per minute granted to a key when the response omits a limit
pub const DEFAULT_MINUTE_LIMIT: i64 = 120;

/// Player looked up by the default key check
const CHECK_PLAYER_UUID: &str = "f7c77d999f154a66a87dc4a51ef30d19";

/// Which endpoint is used to validate the key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyCheck {
    /// Look up a known player
    PlayerLookup {
        #[serde(default = "default_check_uuid")]
        uuid: String,
    },
    /// Query the dedicated key endpoint, which also reports usage
    KeyInfo,
}

fn default_check_uuid() -> String {
    CHECK_PLAYER_UUID.to_string()
}

impl Default for KeyCheck {
    fn default() -> Self {
        Self::PlayerLookup {
            uuid: default_check_uuid(),
        }
    }
}

/// Validates the API key before bulk work
pub struct KeyValidator<'a> {
    source: &'a dyn EndpointSource,
    check: &'a KeyCheck,
    minimum_limit_left: i64,
}

impl<'a> KeyValidator<'a> {
    /// Create a validator over `source`
    pub fn new(source: &'a dyn EndpointSource, check: &'a KeyCheck, minimum_limit_left: i64) -> Self {
        Self {
            source,
            check,
            minimum_limit_left,
        }
    }

    /// Confirm the key is usable for `planned` requests.
    ///
    /// Returns the check response with any key value redacted.
    pub async fn check_key(&self, planned: usize) -> Result<JsonValue> {
        let (endpoint, params) = match self.check {
            KeyCheck::PlayerLookup { uuid } => ("player", QueryParams::mapping([("uuid", uuid)])),
            KeyCheck::KeyInfo => ("key", QueryParams::empty()),
        };

        let fetched = self.source.fetch(endpoint, &params).await?;
        if !fetched.is_success() {
            debug!("Key check response: {}", fetched.body);
            return Err(Error::InvalidKey);
        }

        let mut info = fetched.value;
        if matches!(self.check, KeyCheck::KeyInfo) {
            self.check_budget(&info, planned)?;
        }
        redact_record_key(&mut info);

        info!("API key accepted");
        Ok(info)
    }

    fn check_budget(&self, info: &JsonValue, planned: usize) -> Result<()> {
        let record = info.get("record");
        let Some(used) = record
            .and_then(|r| r.get("queriesInPastMin"))
            .and_then(JsonValue::as_i64)
        else {
            return Ok(());
        };
        let limit = record
            .and_then(|r| r.get("limit"))
            .and_then(JsonValue::as_i64)
            .unwrap_or(DEFAULT_MINUTE_LIMIT);

        let planned = i64::try_from(planned).unwrap_or(i64::MAX);
        let remaining = limit.saturating_sub(used).saturating_sub(planned);
        if remaining <= self.minimum_limit_left {
            return Err(Error::RateLimitBudget {
                limit,
                used,
                planned,
                remaining,
                minimum: self.minimum_limit_left,
            });
        }
        debug!("Key budget: {} of {} left after this batch", remaining, limit);
        Ok(())
    }
}

fn redact_record_key(info: &mut JsonValue) {
    if let Some(key) = info.pointer_mut("/record/key") {
        if let Some(raw) = key.as_str() {
            *key = JsonValue::String(redact_key(raw));
        }
    }
}

/// Mask all but the last four characters of a key
pub fn redact_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let visible = chars.len().saturating_sub(4);
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < visible && *c != '-' { '*' } else { *c })
        .collect()
}
