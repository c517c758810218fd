//! Resolver implementation

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;

/// Parameters accepted by the endpoint fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParams {
    /// Ordered key/value pairs
    Mapping(Vec<(String, String)>),
    /// Pre-formatted query string, optionally starting with `?`
    Raw(String),
}

impl QueryParams {
    /// No parameters at all
    pub fn empty() -> Self {
        Self::Raw(String::new())
    }

    /// Build a mapping from any ordered sequence of pairs
    pub fn mapping<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        Self::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }

    /// Resolve into a query-string fragment, see [`resolve`]
    pub fn resolve(&self) -> Option<String> {
        resolve(self)
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&str> for QueryParams {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for QueryParams {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl<K: Into<String>, V: ToString> From<Vec<(K, V)>> for QueryParams {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::mapping(pairs)
    }
}

impl<V: ToString> From<IndexMap<String, V>> for QueryParams {
    fn from(map: IndexMap<String, V>) -> Self {
        Self::mapping(map)
    }
}

impl<V: ToString> From<BTreeMap<String, V>> for QueryParams {
    fn from(map: BTreeMap<String, V>) -> Self {
        Self::mapping(map)
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryParams::Raw(raw) => f.write_str(raw),
            QueryParams::Mapping(pairs) => {
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str("&")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                Ok(())
            }
        }
    }
}

/// Resolve parameters into a canonical query-string fragment.
///
/// Returns `None` when the input cannot be resolved, which callers must
/// treat as invalid input.
pub fn resolve(params: &QueryParams) -> Option<String> {
    match params {
        QueryParams::Mapping(pairs) => {
            let joined: String = pairs.iter().map(|(k, v)| format!("&{k}={v}")).collect();
            Some(joined.strip_prefix('&').unwrap_or(&joined).to_string())
        }
        QueryParams::Raw(raw) => {
            if raw.contains('#') {
                return None;
            }
            Some(raw.strip_prefix('?').unwrap_or(raw).to_string())
        }
    }
}
