//! Constant synchronization strategies

use super::file::ConstantsFile;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::JsonValue;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::{info, warn};
use url::Url;

/// Assignment of the documentation state inside an inline script
static REDOC_STATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"const __redoc_state\s?=\s?([^\n]+);").unwrap());

/// Where the synchronizer looks for endpoint names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Root of the git trees API
    pub tree_api_base: String,
    /// Documentation page embedding the API specification
    pub doc_url: String,
    /// Documentation repository
    pub repo_url: String,
    /// Branch of the documentation repository
    pub branch: String,
    /// Folder holding one markdown file per endpoint
    pub prefix: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            tree_api_base: "https://api.github.com/repos".to_string(),
            doc_url: "https://api.hypixel.net".to_string(),
            repo_url: "https://github.com/HypixelDev/PublicAPI".to_string(),
            branch: "master".to_string(),
            prefix: "Documentation/methods".to_string(),
        }
    }
}

/// A documentation repository to read endpoint names from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTreeSource {
    /// Repository URL, e.g. `https://github.com/HypixelDev/PublicAPI`
    pub repo_url: String,
    /// Branch to read
    pub branch: String,
    /// Path prefix of the endpoint documents
    pub prefix: String,
}

impl DocTreeSource {
    /// Take the repository coordinates from settings
    pub fn from_settings(settings: &SyncSettings) -> Self {
        Self {
            repo_url: settings.repo_url.clone(),
            branch: settings.branch.clone(),
            prefix: settings.prefix.clone(),
        }
    }

    /// `owner/repo` taken from the repository URL
    pub fn repo_path(&self) -> Result<String> {
        if self.repo_url.trim().is_empty() {
            return Err(Error::bad_parameter("repository URL is empty"));
        }
        let url = Url::parse(&self.repo_url)?;
        let segments: Vec<&str> = url
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        match segments.as_slice() {
            [owner, repo, ..] => Ok(format!("{owner}/{}", repo.trim_end_matches(".git"))),
            _ => Err(Error::bad_parameter(format!(
                "'{}' does not name an owner/repository",
                self.repo_url
            ))),
        }
    }

    /// Prefix without a trailing slash
    pub fn normalized_prefix(&self) -> Result<&str> {
        let prefix = self.prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return Err(Error::bad_parameter("path prefix is empty"));
        }
        Ok(prefix)
    }
}

/// Response of the git trees API
#[derive(Debug, Clone, Deserialize)]
pub struct TreeResponse {
    /// Entries of the recursive tree
    #[serde(default)]
    pub tree: Option<Vec<TreeEntry>>,
    /// Error or rate-limit message
    #[serde(default)]
    pub message: Option<String>,
}

/// One entry of a git tree
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    /// Path relative to the repository root
    pub path: String,
    /// `blob` for files, `tree` for folders
    #[serde(rename = "type")]
    pub kind: String,
}

/// Endpoint names documented under `prefix` in a repository tree.
///
/// `prefix/guild/find.md` becomes `guild/find`.
pub fn endpoints_from_tree(response: &TreeResponse, prefix: &str) -> Result<Vec<String>> {
    let prefix = prefix.trim_end_matches('/');
    let Some(tree) = &response.tree else {
        return Err(Error::invalid_tree(
            response
                .message
                .clone()
                .unwrap_or_else(|| "response has no tree".to_string()),
        ));
    };

    let pattern = Regex::new(&format!(r"^{}/([^.]+)\.md$", regex::escape(prefix)))
        .map_err(|e| Error::bad_parameter(format!("unusable prefix '{prefix}': {e}")))?;

    let endpoints: Vec<String> = tree
        .iter()
        .filter(|entry| entry.kind == "blob")
        .filter_map(|entry| pattern.captures(&entry.path))
        .map(|captures| captures[1].to_string())
        .collect();

    if endpoints.is_empty() {
        return Err(Error::NoEndpoints);
    }
    Ok(endpoints)
}

/// Endpoint names from the specification embedded in a documentation page.
///
/// Keys of `spec.data.paths`, in document order, without the leading `/`.
pub fn endpoints_from_html(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script")
        .map_err(|e| Error::spec_not_found(format!("invalid selector: {e:?}")))?;

    let state = document
        .select(&selector)
        .map(|script| script.text().collect::<String>())
        .find_map(|text| {
            REDOC_STATE_REGEX
                .captures(&text)
                .map(|captures| captures[1].to_string())
        })
        .ok_or_else(|| Error::spec_not_found("no script assigns __redoc_state"))?;

    let state: JsonValue = serde_json::from_str(&state)
        .map_err(|e| Error::spec_not_found(format!("documentation state is not JSON: {e}")))?;
    let paths = state
        .pointer("/spec/data/paths")
        .and_then(JsonValue::as_object)
        .ok_or_else(|| Error::spec_not_found("documentation state has no spec.data.paths"))?;

    Ok(paths
        .keys()
        .map(|path| path.strip_prefix('/').unwrap_or(path).to_string())
        .collect())
}

/// Refreshes the constants file
#[derive(Debug)]
pub struct ConstantSynchronizer {
    client: HttpClient,
    constants_path: PathBuf,
    settings: SyncSettings,
}

impl ConstantSynchronizer {
    /// Create a synchronizer writing to `constants_path`
    pub fn new(
        client: HttpClient,
        constants_path: impl Into<PathBuf>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            client,
            constants_path: constants_path.into(),
            settings,
        }
    }

    /// Settings in use
    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Read endpoint names from a documentation repository and persist them
    pub async fn sync_from_tree(&self, source: &DocTreeSource) -> Result<ConstantsFile> {
        let repo = source.repo_path()?;
        let prefix = source.normalized_prefix()?;
        if source.branch.trim().is_empty() {
            return Err(Error::bad_parameter("branch is empty"));
        }

        let url = format!(
            "{}/{repo}/git/trees/{}?recursive=1",
            self.settings.tree_api_base.trim_end_matches('/'),
            source.branch
        );
        info!("Reading documentation tree of {}@{}", repo, source.branch);

        let response: TreeResponse = match self.client.get_json(&url).await {
            Ok(response) => response,
            Err(Error::HttpStatus { status, body }) => {
                let message = serde_json::from_str::<JsonValue>(&body)
                    .ok()
                    .and_then(|v| v.get("message").and_then(JsonValue::as_str).map(String::from))
                    .unwrap_or(body);
                return Err(Error::invalid_tree(format!("HTTP {status}: {message}")));
            }
            Err(e) => return Err(e),
        };
        if let Some(message) = &response.message {
            warn!("Tree API message: {}", message);
        }

        let endpoints = endpoints_from_tree(&response, prefix)?;
        self.persist(endpoints).await
    }

    /// Read endpoint names from the documentation page and persist them.
    ///
    /// Falls back to the configured documentation URL.
    pub async fn sync_from_spec(&self, doc_url: Option<&str>) -> Result<ConstantsFile> {
        let doc_url = doc_url.unwrap_or(&self.settings.doc_url);
        info!("Reading API specification from {}", doc_url);

        let html = self.client.get_text(doc_url).await?;
        let endpoints = endpoints_from_html(&html)?;
        if endpoints.is_empty() {
            return Err(Error::NoEndpoints);
        }
        self.persist(endpoints).await
    }

    async fn persist(&self, endpoints: Vec<String>) -> Result<ConstantsFile> {
        let constants = ConstantsFile::new(endpoints);
        constants.save(&self.constants_path).await?;
        info!(
            "Registered {} endpoints in {}",
            constants.endpoints.len(),
            self.constants_path.display()
        );
        Ok(constants)
    }
}
