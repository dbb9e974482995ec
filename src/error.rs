//! Error types for pdfrelay.
//!
//! The taxonomy mirrors the pipeline stages:
//!
//! - [`ValidationError`]: the upload set or batch input is rejected before
//!   any work is performed.
//! - [`MergeError`]: an input PDF could not be read or the page tree could
//!   not be assembled; the whole merge is aborted.
//! - [`DeliveryError`]: the mail hand-off failed. Deliberately *not*
//!   convertible into [`RelayError`] — delivery failures degrade to a
//!   download path instead of aborting the job, so callers must handle
//!   them explicitly.
//! - [`RelayError`]: top-level error returned by the pipeline and the
//!   supporting I/O layers.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfrelay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

fn mb(bytes: &u64) -> String {
    format!("{:.2}", *bytes as f64 / BYTES_PER_MB)
}

/// Rejection reasons produced by intake and batch validation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// No files were submitted at all.
    #[error("No PDF files were provided")]
    NoFiles,

    /// More files than the configured maximum.
    #[error("Too many files: {count} selected, at most {max} allowed")]
    TooManyFiles {
        /// Number of files submitted.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A file without a `.pdf` extension slipped into the set.
    #[error("Invalid file type: {filename}. Only PDF files are allowed")]
    NotAPdf {
        /// Name of the offending file.
        filename: String,
    },

    /// Cumulative upload size crossed the configured limit.
    #[error(
        "Total file size ({} MB) exceeds the {} MB limit",
        mb(.total_bytes),
        mb(.limit_bytes)
    )]
    SizeExceeded {
        /// Actual cumulative size in bytes.
        total_bytes: u64,
        /// Configured limit in bytes.
        limit_bytes: u64,
    },

    /// Single-job mode requires a recipient address.
    #[error("Please provide a recipient email address")]
    MissingRecipient,

    /// A batch section lacks one of its required text fields.
    #[error("Section {position} is missing a {field}. Please fill out both fields")]
    IncompleteSection {
        /// 1-based position of the section in the batch.
        position: usize,
        /// Which field is missing ("PO" or "Location").
        field: &'static str,
    },

    /// Two batch sections resolved to the same output filename.
    #[error("Duplicate output filename in batch: {filename}")]
    DuplicateOutput {
        /// The colliding entry name.
        filename: String,
    },

    /// Every section was skipped; there is nothing to archive.
    #[error("No valid merge jobs were processed")]
    EmptyBatch,
}

/// Failures while concatenating PDF byte-streams.
///
/// Any variant aborts the whole merge: no output is produced.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The input sequence was empty.
    #[error("No documents to merge")]
    NoInputs,

    /// An input could not be parsed as a PDF (or has no pages).
    #[error("Failed to merge PDF: {name} (input {position}): {reason}")]
    UnreadableInput {
        /// Original filename of the offending input.
        name: String,
        /// 1-based position in the input order.
        position: usize,
        /// Parser-provided detail.
        reason: String,
    },

    /// The merged document's page tree could not be assembled.
    #[error("Failed to update the merged page tree: {reason}")]
    PageTree {
        /// Underlying detail.
        reason: String,
    },

    /// The merged document could not be serialized to bytes.
    #[error("Failed to write the merged document: {reason}")]
    Serialize {
        /// Underlying detail.
        reason: String,
    },
}

impl MergeError {
    /// Create an [`MergeError::UnreadableInput`] for the given input.
    pub fn unreadable(name: impl Into<String>, position: usize, reason: impl Into<String>) -> Self {
        Self::UnreadableInput {
            name: name.into(),
            position,
            reason: reason.into(),
        }
    }

    /// Create a [`MergeError::PageTree`] error.
    pub fn page_tree(reason: impl Into<String>) -> Self {
        Self::PageTree {
            reason: reason.into(),
        }
    }
}

/// Failures while handing the merged artifact to the mail transport.
///
/// These never abort a job; the pipeline keeps the artifact on disk and
/// reports a download fallback instead.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// SMTP settings are missing a server, username, or password.
    #[error("Email configuration is incomplete. Cannot send email")]
    IncompleteConfig,

    /// A sender or recipient address failed to parse.
    #[error("Invalid email address {address}: {reason}")]
    InvalidAddress {
        /// The address as submitted.
        address: String,
        /// Parser detail.
        reason: String,
    },

    /// The message itself could not be assembled.
    #[error("Failed to compose email: {reason}")]
    Compose {
        /// Underlying detail.
        reason: String,
    },

    /// The SMTP session failed (connect, auth, or transmit).
    #[error("Failed to send email. Check SMTP configuration and credentials. Error: {reason}")]
    Transport {
        /// Underlying detail.
        reason: String,
    },
}

/// Top-level error for pipeline and I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The upload set or batch input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The merge engine failed.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// A staged input could not be written or read back.
    #[error("Failed to stage upload {filename}: {source}")]
    Staging {
        /// Original filename of the upload.
        filename: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The merged artifact could not be written to the output directory.
    #[error("Failed to write merged artifact {path}: {source}")]
    WriteArtifact {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The requested artifact does not exist in the output directory.
    #[error("Artifact not found: {filename}")]
    ArtifactNotFound {
        /// The requested filename.
        filename: String,
    },

    /// An artifact name tried to escape the output directory.
    #[error("Invalid artifact name: {filename}")]
    InvalidArtifactName {
        /// The rejected filename.
        filename: String,
    },

    /// The ZIP container could not be assembled.
    #[error("Archive packaging failed: {reason}")]
    Archive {
        /// Underlying detail.
        reason: String,
    },

    /// A CLI input pattern failed to parse.
    #[error("Failed to parse input pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A glob entry could not be resolved.
    #[error("Failed to process input pattern entry: {0}")]
    Glob(#[from] glob::GlobError),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RelayError {
    /// Create a [`RelayError::Staging`] error.
    pub fn staging(filename: impl Into<String>, source: io::Error) -> Self {
        Self::Staging {
            filename: filename.into(),
            source,
        }
    }

    /// Create a [`RelayError::Archive`] error.
    pub fn archive(reason: impl Into<String>) -> Self {
        Self::Archive {
            reason: reason.into(),
        }
    }
}
