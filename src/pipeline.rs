//! Single-job pipeline: intake, label resolution, merge, delivery,
//! cleanup.
//!
//! Stages run strictly in order. Validation and merge failures abort the
//! job; a failed email send does not — the merged artifact stays on disk
//! and the outcome degrades to a download fallback. Staged inputs are
//! removed on every exit path.

use std::sync::Arc;

use crate::config::{AppConfig, EMAIL_BODY};
use crate::error::{Result, ValidationError};
use crate::intake::{UploadSet, UploadedFile};
use crate::io::{ArtifactStore, StagedUpload, Staging};
use crate::label::{self, JobLabel, LabelSource};
use crate::delivery::{MailTransport, OutgoingMail, SmtpMailer};
use crate::merge::{MergedPdf, Merger, SourcePdf};

/// How the merged artifact reached the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The artifact was emailed (and removed from disk).
    Emailed {
        /// Transport confirmation message.
        message: String,
    },
    /// Email failed; the artifact is retained for manual download.
    DownloadOnly {
        /// Why the send failed.
        reason: String,
    },
}

/// Result of one completed single-job run.
#[derive(Debug)]
pub struct OrderOutcome {
    /// The resolved or synthesized job label.
    pub label: JobLabel,
    /// Whether the label was derived or a fallback.
    pub label_source: LabelSource,
    /// Filename of the consolidated document.
    pub artifact_filename: String,
    /// Pages in the merged document.
    pub page_count: usize,
    /// How delivery ended.
    pub delivery: Delivery,
}

/// Orchestrator for single-job order processing.
pub struct OrderProcessor {
    config: AppConfig,
    staging: Staging,
    artifacts: ArtifactStore,
    mailer: Arc<dyn MailTransport>,
}

impl OrderProcessor {
    /// Create a processor that delivers through SMTP.
    pub fn new(config: AppConfig) -> Self {
        let mailer = Arc::new(SmtpMailer::new(config.smtp.clone()));
        Self::with_mailer(config, mailer)
    }

    /// Create a processor with a caller-provided transport.
    pub fn with_mailer(config: AppConfig, mailer: Arc<dyn MailTransport>) -> Self {
        let staging = Staging::new(&config.workspace.upload_dir);
        let artifacts = ArtifactStore::new(&config.workspace.output_dir);
        Self {
            config,
            staging,
            artifacts,
            mailer,
        }
    }

    /// The artifact store backing the download boundary.
    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Run the whole pipeline for one upload set.
    ///
    /// # Errors
    ///
    /// Returns validation errors (bad recipient, rejected set), merge
    /// errors naming the offending input, or I/O errors from staging and
    /// artifact writes. A delivery failure is *not* an error; it is
    /// reported through [`Delivery::DownloadOnly`].
    pub async fn process(
        &self,
        recipient: &str,
        files: Vec<UploadedFile>,
    ) -> Result<OrderOutcome> {
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(ValidationError::MissingRecipient.into());
        }

        let set = UploadSet::validate(files, &self.config.limits)?;
        tracing::info!(files = set.len(), bytes = set.total_bytes(), "upload set accepted");

        let (label, label_source) =
            label::resolve_or_fallback(set.filenames(), &self.config.stoplist);
        if label_source == LabelSource::Fallback {
            tracing::warn!(%label, "could not identify an order id, using fallback label");
        }

        let staged = self.staging.persist(&set).await?;
        let result = self
            .merge_and_deliver(recipient, &label, &staged)
            .await;

        // Staged inputs are transient regardless of how the job ended.
        self.staging.cleanup(&staged).await;

        let (page_count, delivery) = result?;
        Ok(OrderOutcome {
            artifact_filename: label.artifact_filename(),
            label,
            label_source,
            page_count,
            delivery,
        })
    }

    async fn merge_and_deliver(
        &self,
        recipient: &str,
        label: &JobLabel,
        staged: &[StagedUpload],
    ) -> Result<(usize, Delivery)> {
        let artifact_filename = label.artifact_filename();

        let merged = match self.merge_staged(staged).await {
            Ok(merged) => merged,
            Err(e) => {
                // Roll back any artifact this job may have left behind
                // before surfacing the merge failure.
                let _ = self.artifacts.remove_if_exists(&artifact_filename).await;
                return Err(e);
            }
        };

        self.artifacts.write(&artifact_filename, &merged.bytes).await?;
        tracing::info!(
            artifact = %artifact_filename,
            pages = merged.page_count,
            "merged document written"
        );

        let delivery = self
            .send_email(recipient, label, &artifact_filename, merged.bytes)
            .await;

        match &delivery {
            Delivery::Emailed { .. } => {
                // Hand-off complete; the on-disk copy has served its purpose.
                if let Err(e) = self.artifacts.remove_if_exists(&artifact_filename).await {
                    tracing::debug!(artifact = %artifact_filename, error = %e, "artifact already gone");
                }
            }
            Delivery::DownloadOnly { reason } => {
                tracing::error!(
                    artifact = %artifact_filename,
                    reason = %reason,
                    "email delivery failed, artifact retained for download"
                );
            }
        }

        Ok((merged.page_count, delivery))
    }

    async fn merge_staged(&self, staged: &[StagedUpload]) -> Result<MergedPdf> {
        let mut sources = Vec::with_capacity(staged.len());
        for upload in staged {
            let bytes = self.staging.read_back(upload).await?;
            sources.push(SourcePdf::new(upload.original_name.clone(), bytes));
        }

        let merged = tokio::task::spawn_blocking(move || Merger::merge_to_bytes(&sources))
            .await
            .map_err(|e| {
                std::io::Error::other(format!("merge task failed: {e}"))
            })??;

        Ok(merged)
    }

    async fn send_email(
        &self,
        recipient: &str,
        label: &JobLabel,
        artifact_filename: &str,
        attachment: Vec<u8>,
    ) -> Delivery {
        let mailer = Arc::clone(&self.mailer);
        let to = recipient.to_string();
        let subject = label.email_subject();
        let filename = artifact_filename.to_string();

        let sent = tokio::task::spawn_blocking(move || {
            mailer.send(&OutgoingMail {
                to: &to,
                subject: &subject,
                body: EMAIL_BODY,
                attachment_name: &filename,
                attachment: &attachment,
            })
        })
        .await;

        match sent {
            Ok(Ok(message)) => Delivery::Emailed { message },
            Ok(Err(e)) => Delivery::DownloadOnly {
                reason: e.to_string(),
            },
            Err(e) => Delivery::DownloadOnly {
                reason: format!("mail task failed: {e}"),
            },
        }
    }
}
