//! Transient staging of accepted uploads.
//!
//! Accepted single-job uploads are persisted under the staging directory
//! until the merge completes, then removed again. Staged names are
//! sanitized and prefixed with the input position so two uploads can
//! never clobber each other. Cleanup is best-effort: a file that is
//! already gone is not an error.

use std::path::{Path, PathBuf};

use crate::error::{RelayError, Result};
use crate::intake::{UploadSet, sanitize_filename};

/// One staged input file.
#[derive(Debug, Clone)]
pub struct StagedUpload {
    /// Filename as originally submitted.
    pub original_name: String,
    /// Where the bytes were staged.
    pub path: PathBuf,
}

/// Staging area for one job's transient inputs.
#[derive(Debug, Clone)]
pub struct Staging {
    dir: PathBuf,
}

impl Staging {
    /// Create a staging area rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The staging directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist every file of a validated set to the staging directory.
    ///
    /// Files are written in submission order as `NN_<sanitized-name>`.
    /// If any write fails, files staged so far are removed again before
    /// the error is returned, so a failed persist leaves nothing behind.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Staging`] naming the upload that failed.
    pub async fn persist(&self, set: &UploadSet) -> Result<Vec<StagedUpload>> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(RelayError::Io)?;

        let mut staged = Vec::with_capacity(set.len());
        for (idx, file) in set.files().iter().enumerate() {
            let staged_name = format!("{:02}_{}", idx, sanitize_filename(&file.filename));
            let path = self.dir.join(staged_name);

            if let Err(e) = tokio::fs::write(&path, &file.bytes).await {
                self.cleanup(&staged).await;
                return Err(RelayError::staging(&file.filename, e));
            }

            staged.push(StagedUpload {
                original_name: file.filename.clone(),
                path,
            });
        }

        Ok(staged)
    }

    /// Read a staged file back into memory.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Staging`] if the file cannot be read.
    pub async fn read_back(&self, staged: &StagedUpload) -> Result<Vec<u8>> {
        tokio::fs::read(&staged.path)
            .await
            .map_err(|e| RelayError::staging(&staged.original_name, e))
    }

    /// Remove staged files, swallowing failures.
    pub async fn cleanup(&self, staged: &[StagedUpload]) {
        for upload in staged {
            if let Err(e) = tokio::fs::remove_file(&upload.path).await {
                tracing::debug!(
                    path = %upload.path.display(),
                    error = %e,
                    "staged file already gone or not removable"
                );
            }
        }
    }
}
