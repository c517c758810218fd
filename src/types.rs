//! Common types used throughout api-mirror
//!
//! Endpoint names and endpoint sets are the unit of work for every update
//! pass, so they are validated once here and trusted everywhere else.

use crate::error::{Error, Result};
use indexmap::IndexSet;
use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Extension used for every cached endpoint file
pub const JSON_EXTENSION: &str = "json";

// ============================================================================
// Endpoint Name
// ============================================================================

/// A slash-delimited name identifying a remote resource, e.g. `guild/find`.
///
/// A name never escapes the directory it is joined onto: empty segments,
/// `.`/`..` segments, backslashes and leading slashes are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointName(String);

impl EndpointName {
    /// Validate and wrap an endpoint name
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_name(name, "name is empty"));
        }
        if name.contains('\\') {
            return Err(Error::invalid_name(name, "backslashes are not allowed"));
        }
        if name.starts_with('/') {
            return Err(Error::invalid_name(name, "name must not start with '/'"));
        }
        for segment in name.split('/') {
            match segment {
                "" => return Err(Error::invalid_name(name, "empty path segment")),
                "." | ".." => {
                    return Err(Error::invalid_name(name, "relative path segment"));
                }
                _ => {}
            }
        }
        Ok(Self(name))
    }

    /// The name as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Folder portion of a nested name (`guild/find` -> `guild`)
    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(parent, _)| parent)
    }

    /// Location of the cached file under `root` (`<root>/<name>.json`)
    pub fn file_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        let (folders, file) = self.0.rsplit_once('/').unwrap_or(("", &self.0));
        for segment in folders.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{file}.{JSON_EXTENSION}"));
        path
    }
}

impl fmt::Display for EndpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EndpointName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Endpoint Set
// ============================================================================

/// Insertion-ordered set of unique endpoint names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointSet(IndexSet<EndpointName>);

impl EndpointSet {
    /// Validate every name and collapse duplicates, keeping first occurrences
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = IndexSet::new();
        for name in names {
            set.insert(EndpointName::new(name)?);
        }
        Ok(Self(set))
    }

    /// Number of unique names
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate names in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &EndpointName> {
        self.0.iter()
    }

    /// Unique parent folders of nested names, in first-seen order
    pub fn parent_folders(&self) -> IndexSet<&str> {
        self.0.iter().filter_map(EndpointName::parent).collect()
    }
}

impl<'a> IntoIterator for &'a EndpointSet {
    type Item = &'a EndpointName;
    type IntoIter = indexmap::set::Iter<'a, EndpointName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_name_valid() {
        let name = EndpointName::new("player").unwrap();
        assert_eq!(name.as_str(), "player");
        assert_eq!(name.parent(), None);

        let nested = EndpointName::new("skyblock/auctions/ended").unwrap();
        assert_eq!(nested.parent(), Some("skyblock/auctions"));
    }

    #[test]
    fn test_endpoint_name_rejects_escapes() {
        for bad in ["", "/player", "../secret", "guild/../../etc", "a//b", "a/./b", "a\\b", "guild/"] {
            let err = EndpointName::new(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidEndpointName { .. }),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_endpoint_file_path() {
        let root = Path::new("/cache/endpoints");
        let name = EndpointName::new("guild/find").unwrap();
        assert_eq!(
            name.file_path(root),
            PathBuf::from("/cache/endpoints/guild/find.json")
        );

        let dotted = EndpointName::new("resources/games.v2").unwrap();
        assert_eq!(
            dotted.file_path(root),
            PathBuf::from("/cache/endpoints/resources/games.v2.json")
        );
    }

    #[test]
    fn test_endpoint_set_dedup_keeps_order() {
        let set =
            EndpointSet::from_names(["player", "guild/find", "player", "boosters"]).unwrap();
        let names: Vec<&str> = set.iter().map(EndpointName::as_str).collect();
        assert_eq!(names, vec!["player", "guild/find", "boosters"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_endpoint_set_parent_folders() {
        let set = EndpointSet::from_names([
            "skyblock/auctions",
            "skyblock/bazaar",
            "resources/games",
            "player",
        ])
        .unwrap();
        let folders: Vec<&str> = set.parent_folders().into_iter().collect();
        assert_eq!(folders, vec!["skyblock", "resources"]);
    }

    #[test]
    fn test_endpoint_set_rejects_invalid_member() {
        assert!(EndpointSet::from_names(["player", "../x"]).is_err());
    }
}
