//! Persistence of generated feature files.

use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};

/// Writes generated feature files under a fixed output directory.
///
/// The output directory is the only resource shared across requests.
/// Artifacts with the same name overwrite each other; concurrent requests
/// producing colliding names race, last write wins.
#[derive(Debug, Clone)]
pub struct FeatureStore {
    output_dir: PathBuf,
}

impl FeatureStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if it does not exist yet.
    ///
    /// Idempotent; called once at application startup rather than on every
    /// request.
    pub async fn ensure_output_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await.map_err(Error::storage)
    }

    /// Write a feature file, replacing any existing artifact with that name.
    ///
    /// The content lands in a temporary sibling first and is renamed into
    /// place, so a failed write never leaves a partial feature file behind.
    #[tracing::instrument(skip(self, content))]
    pub async fn write_feature(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(filename);
        let tmp = self.output_dir.join(format!("{filename}.tmp"));

        if let Err(source) = tokio::fs::write(&tmp, content).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(Error::storage(source));
        }
        tokio::fs::rename(&tmp, &path).await.map_err(Error::storage)?;

        tracing::debug!(path = %path.display(), "Stored feature file");
        Ok(path)
    }
}
