//! Tests for the auth module

use super::*;
use crate::error::{Error, Result};
use crate::fetcher::{EndpointSource, FetchedEndpoint};
use crate::params::QueryParams;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

/// Source answering every request with one canned body
struct CannedSource {
    body: String,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl CannedSource {
    fn new(body: serde_json::Value) -> Self {
        Self {
            body: body.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EndpointSource for CannedSource {
    async fn fetch(&self, name: &str, params: &QueryParams) -> Result<FetchedEndpoint> {
        self.requests
            .lock()
            .unwrap()
            .push((name.to_string(), params.resolve()));
        FetchedEndpoint::parse(self.body.clone())
    }
}

struct DownSource;

#[async_trait]
impl EndpointSource for DownSource {
    async fn fetch(&self, _name: &str, _params: &QueryParams) -> Result<FetchedEndpoint> {
        Err(Error::ServiceUnavailable)
    }
}

#[test]
fn test_credential_debug_is_redacted() {
    let credential = Credential::new("super-secret");
    let debug = format!("{credential:?}");
    assert!(!debug.contains("super-secret"));
    assert_eq!(credential.expose(), "super-secret");
}

#[test]
fn test_key_placement_default_is_header() {
    assert_eq!(
        KeyPlacement::default(),
        KeyPlacement::Header {
            name: "API-Key".to_string()
        }
    );
}

#[test]
fn test_key_placement_from_yaml() {
    let placement: KeyPlacement = serde_yaml::from_str("location: query").unwrap();
    assert_eq!(
        placement,
        KeyPlacement::Query {
            param: "key".to_string()
        }
    );
}

#[test]
fn test_api_key_header_applied() {
    let auth = ApiKeyAuth::new(Credential::new("k-123"), KeyPlacement::default());
    let req = auth.apply(reqwest::Client::new().get("https://example.com/player"));
    let built = req.build().unwrap();
    assert_eq!(built.headers().get("API-Key").unwrap(), "k-123");
}

#[test]
fn test_api_key_query_applied() {
    let auth = ApiKeyAuth::new(
        Credential::new("k-123"),
        KeyPlacement::Query {
            param: "key".to_string(),
        },
    );
    let req = auth.apply(reqwest::Client::new().get("https://example.com/player?uuid=1"));
    let built = req.build().unwrap();
    assert_eq!(built.url().query(), Some("uuid=1&key=k-123"));
}

#[test]
fn test_redact_key() {
    assert_eq!(redact_key("abcd-1234-wxyz"), "****-****-wxyz");
    assert_eq!(redact_key("abc"), "abc");
}

#[tokio::test]
async fn test_player_lookup_accepts_valid_key() {
    let source = CannedSource::new(json!({"success": true, "player": null}));
    let check = KeyCheck::default();
    let validator = KeyValidator::new(&source, &check, 0);

    validator.check_key(10).await.unwrap();

    let requests = source.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "player");
    assert_eq!(
        requests[0].1.as_deref(),
        Some("uuid=f7c77d999f154a66a87dc4a51ef30d19")
    );
}

#[tokio::test]
async fn test_unsuccessful_response_is_invalid_key() {
    let source = CannedSource::new(json!({"success": false, "cause": "Invalid API key"}));
    let check = KeyCheck::default();
    let err = KeyValidator::new(&source, &check, 0)
        .check_key(1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidKey));
}

#[tokio::test]
async fn test_fetch_failure_propagates() {
    let check = KeyCheck::default();
    let err = KeyValidator::new(&DownSource, &check, 0)
        .check_key(1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ServiceUnavailable));
}

#[tokio::test]
async fn test_key_info_within_budget_is_redacted() {
    let source = CannedSource::new(json!({
        "success": true,
        "record": {"key": "aaaa-bbbb-cccc", "queriesInPastMin": 10, "limit": 120}
    }));
    let info = KeyValidator::new(&source, &KeyCheck::KeyInfo, 5)
        .check_key(50)
        .await
        .unwrap();

    assert_eq!(info["record"]["key"], "****-****-cccc");
    assert_eq!(source.requests.lock().unwrap()[0].0, "key");
}

#[tokio::test]
async fn test_key_info_refuses_when_budget_exhausted() {
    // 120 - 100 - 20 = 0 <= 0
    let source = CannedSource::new(json!({
        "success": true,
        "record": {"queriesInPastMin": 100}
    }));
    let err = KeyValidator::new(&source, &KeyCheck::KeyInfo, 0)
        .check_key(20)
        .await
        .unwrap_err();

    match err {
        Error::RateLimitBudget {
            limit, remaining, ..
        } => {
            assert_eq!(limit, DEFAULT_MINUTE_LIMIT);
            assert_eq!(remaining, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_key_info_honours_minimum_limit_left() {
    // 120 - 10 - 50 = 60 <= 60
    let source = CannedSource::new(json!({
        "success": true,
        "record": {"queriesInPastMin": 10}
    }));
    let result = KeyValidator::new(&source, &KeyCheck::KeyInfo, 60)
        .check_key(50)
        .await;
    assert!(matches!(result, Err(Error::RateLimitBudget { .. })));

    let result = KeyValidator::new(&source, &KeyCheck::KeyInfo, 59)
        .check_key(50)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_player_lookup_ignores_budget() {
    let source = CannedSource::new(json!({
        "success": true,
        "record": {"queriesInPastMin": 119}
    }));
    let check = KeyCheck::default();
    assert!(KeyValidator::new(&source, &check, 0)
        .check_key(500)
        .await
        .is_ok());
}
