//! Configuration surface for pdfrelay.
//!
//! Everything here is environment-provided with hard-coded defaults that
//! match the deployment the pipeline was written for: upload limits,
//! SMTP credentials, working directories, and the label stoplist.

use std::path::PathBuf;

/// Default maximum file count for a single-job upload.
pub const DEFAULT_MAX_FILE_COUNT: usize = 15;

/// Default combined-size limit for a single-job upload, in megabytes.
pub const DEFAULT_MAX_COMBINED_MB: u64 = 25;

/// Default maximum file count per batch section.
pub const BATCH_MAX_FILE_COUNT: usize = 10;

/// Default combined-size limit per batch section, in megabytes.
pub const BATCH_MAX_COMBINED_MB: u64 = 15;

/// Fixed body text attached to every outgoing order email.
pub const EMAIL_BODY: &str = "Dear Customer,\n\n\
Please find your merged Order Document attached.\n\n\
This document consolidates all related files for your Order ID.\n\n\
Best regards,\n\
The System Team";

/// Upload-set limits enforced by intake validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of files in one upload set.
    pub max_file_count: usize,
    /// Maximum cumulative size of one upload set, in bytes.
    pub max_combined_bytes: u64,
}

impl Limits {
    /// Limits for single-job (email) mode.
    pub fn single() -> Self {
        Self {
            max_file_count: DEFAULT_MAX_FILE_COUNT,
            max_combined_bytes: DEFAULT_MAX_COMBINED_MB * 1024 * 1024,
        }
    }

    /// Limits for one batch section.
    pub fn batch() -> Self {
        Self {
            max_file_count: BATCH_MAX_FILE_COUNT,
            max_combined_bytes: BATCH_MAX_COMBINED_MB * 1024 * 1024,
        }
    }

    /// Custom limits with the size given in megabytes.
    pub fn new(max_file_count: usize, max_combined_mb: u64) -> Self {
        Self {
            max_file_count,
            max_combined_bytes: max_combined_mb * 1024 * 1024,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::single()
    }
}

/// Outbound mail settings.
///
/// Read from the environment; the password is expected to be an
/// app-specific credential for the configured SMTP account.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub server: String,
    /// SMTP port (STARTTLS).
    pub port: u16,
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Sender address placed in the `From` header.
    pub sender: String,
}

impl SmtpConfig {
    /// Load settings from `SMTP_SERVER`, `SMTP_PORT`, `SMTP_USERNAME`,
    /// `SMTP_PASSWORD`, and `SENDER_EMAIL`, with the same defaults the
    /// original deployment used. `SENDER_EMAIL` falls back to the
    /// username.
    pub fn from_env() -> Self {
        let username =
            std::env::var("SMTP_USERNAME").unwrap_or_else(|_| "user@example.com".to_string());
        Self {
            server: std::env::var("SMTP_SERVER").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            sender: std::env::var("SENDER_EMAIL").unwrap_or_else(|_| username.clone()),
            username,
        }
    }

    /// Whether enough settings are present to attempt a send.
    pub fn is_complete(&self) -> bool {
        !self.server.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Working directories for staged inputs and merged outputs.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Transient staging area for accepted uploads.
    pub upload_dir: PathBuf,
    /// Directory merged artifacts are written to and served from.
    pub output_dir: PathBuf,
}

impl Workspace {
    /// Create a workspace rooted at the given directories.
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new("uploads", "outputs")
    }
}

/// Generic filenames that never qualify as a job label.
///
/// The default list covers the obvious placeholder names scanners and
/// browsers produce. Deployments can extend it via `LABEL_STOPLIST`
/// (comma-separated) or [`Stoplist::new`].
#[derive(Debug, Clone)]
pub struct Stoplist(Vec<String>);

impl Stoplist {
    /// Build a stoplist from arbitrary names; matching is case-insensitive.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            names
                .into_iter()
                .map(|s| s.into().to_lowercase())
                .collect(),
        )
    }

    /// Read `LABEL_STOPLIST` from the environment, falling back to the
    /// default list when unset or empty.
    pub fn from_env() -> Self {
        match std::env::var("LABEL_STOPLIST") {
            Ok(raw) if !raw.trim().is_empty() => {
                Self::new(raw.split(',').map(str::trim).filter(|s| !s.is_empty()))
            }
            _ => Self::default(),
        }
    }

    /// Whether `name` is a generic placeholder (case-insensitive).
    pub fn contains(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.0.iter().any(|entry| *entry == lowered)
    }
}

impl Default for Stoplist {
    fn default() -> Self {
        Self::new(["file", "document", "page", "scan"])
    }
}

/// Complete configuration for the single-job pipeline.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Upload-set limits.
    pub limits: Limits,
    /// Outbound mail settings.
    pub smtp: SmtpConfig,
    /// Staging and output directories.
    pub workspace: Workspace,
    /// Label stoplist.
    pub stoplist: Stoplist,
}

impl AppConfig {
    /// Assemble the full configuration from the environment with
    /// single-job defaults.
    pub fn from_env() -> Self {
        Self {
            limits: Limits::single(),
            smtp: SmtpConfig::from_env(),
            workspace: Workspace::default(),
            stoplist: Stoplist::from_env(),
        }
    }
}
