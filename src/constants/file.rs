//! Constants file persistence

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Contents of `constants.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantsFile {
    /// Known endpoint names, in documentation order
    pub endpoints: Vec<String>,
}

impl ConstantsFile {
    /// Wrap a list of endpoint names
    pub fn new(endpoints: Vec<String>) -> Self {
        Self { endpoints }
    }

    /// Load a constants file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config(format!(
                    "Constants file {} not found; run updateconstant first",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Overwrite the constants file.
    ///
    /// Written to a temporary sibling first and renamed into place.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, path).await?;

        debug!(
            "Saved {} endpoints to {}",
            self.endpoints.len(),
            path.display()
        );
        Ok(())
    }
}
