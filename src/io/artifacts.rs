//! Merged artifact store.
//!
//! Artifacts are written atomically (temp file, then rename) so a partial
//! output can never become visible under its final name. The store also
//! implements the download boundary: fetching a named artifact back out
//! of the output directory, with traversal-safe name handling.

use std::path::{Path, PathBuf};

use crate::error::{RelayError, Result};

/// Store for merged output documents.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute-ish path of a named artifact inside the store.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidArtifactName`] for names that contain
    /// path separators or parent components.
    pub fn path_of(&self, filename: &str) -> Result<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(RelayError::InvalidArtifactName {
                filename: filename.to_string(),
            });
        }
        Ok(self.dir.join(filename))
    }

    /// Write an artifact atomically under the given filename.
    ///
    /// The bytes go to a `.tmp` sibling first and are renamed into place
    /// only once fully written.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::WriteArtifact`] if the directory cannot be
    /// created or either write step fails.
    pub async fn write(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_of(filename)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| RelayError::WriteArtifact {
                path: self.dir.clone(),
                source: e,
            })?;

        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, bytes)
            .await
            .map_err(|e| RelayError::WriteArtifact {
                path: tmp_path.clone(),
                source: e,
            })?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            // Do not leave the temp file behind on a failed rename.
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(RelayError::WriteArtifact {
                path: path.clone(),
                source: e,
            });
        }

        Ok(path)
    }

    /// Whether a named artifact currently exists.
    pub async fn exists(&self, filename: &str) -> bool {
        match self.path_of(filename) {
            Ok(path) => tokio::fs::metadata(path).await.is_ok(),
            Err(_) => false,
        }
    }

    /// Fetch a named artifact's bytes (the download boundary).
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ArtifactNotFound`] when the file does not
    /// exist, or [`RelayError::InvalidArtifactName`] for unsafe names.
    pub async fn fetch(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.path_of(filename)?;
        tokio::fs::read(&path)
            .await
            .map_err(|_| RelayError::ArtifactNotFound {
                filename: filename.to_string(),
            })
    }

    /// Remove a named artifact if it exists; missing files are fine.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::WriteArtifact`] if the file exists but
    /// cannot be removed.
    pub async fn remove_if_exists(&self, filename: &str) -> Result<()> {
        let path = self.path_of(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RelayError::WriteArtifact { path, source: e }),
        }
    }
}
