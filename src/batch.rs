//! Batch mode: multiple merge jobs packaged into one archive.
//!
//! A [`BatchSession`] is an explicit, per-session container of ordered
//! job sections. Sections carry stable identifiers, so removing one never
//! shifts its neighbors, and the session is an owned value that cannot
//! leak between users. Processing walks the sections strictly in order:
//! each one is validated, merged in memory, and added to the archive.

use std::fmt;

use crate::config::Limits;
use crate::delivery::{Archive, BatchArchive};
use crate::error::{Result, ValidationError};
use crate::intake::{UploadSet, UploadedFile};
use crate::merge::{Merger, SourcePdf};

/// Stable identifier of one job section within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(u64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section-{}", self.0)
    }
}

/// One merge job: a purchase order, a location, and its files.
#[derive(Debug)]
pub struct JobSection {
    id: SectionId,
    /// Purchase-order label; first half of the entry filename.
    pub po: String,
    /// Location label; second half of the entry filename.
    pub location: String,
    /// Files to merge for this job, in order.
    pub files: Vec<UploadedFile>,
}

impl JobSection {
    /// The section's stable identifier.
    pub fn id(&self) -> SectionId {
        self.id
    }
}

/// Outcome of processing a whole batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// The finished, downloadable ZIP.
    pub archive: Archive,
    /// Number of sections that produced a merged document.
    pub jobs_merged: usize,
    /// Human-readable notices for sections skipped for having no files.
    pub notices: Vec<String>,
}

/// Per-session accumulation of batch job sections.
#[derive(Debug)]
pub struct BatchSession {
    sections: Vec<JobSection>,
    next_id: u64,
    limits: Limits,
}

impl BatchSession {
    /// Create a session with one empty section, enforcing the given
    /// per-section limits.
    pub fn new(limits: Limits) -> Self {
        let mut session = Self {
            sections: Vec::new(),
            next_id: 0,
            limits,
        };
        session.add_section();
        session
    }

    /// Append an empty section and return its identifier.
    pub fn add_section(&mut self) -> SectionId {
        let id = SectionId(self.next_id);
        self.next_id += 1;
        self.sections.push(JobSection {
            id,
            po: String::new(),
            location: String::new(),
            files: Vec::new(),
        });
        id
    }

    /// Remove a section by id. The last remaining section cannot be
    /// removed. Returns whether a section was removed.
    pub fn remove_section(&mut self, id: SectionId) -> bool {
        if self.sections.len() <= 1 {
            return false;
        }
        let before = self.sections.len();
        self.sections.retain(|s| s.id != id);
        self.sections.len() != before
    }

    /// Mutable access to a section by id.
    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut JobSection> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// The sections, in order.
    pub fn sections(&self) -> &[JobSection] {
        &self.sections
    }

    /// Number of sections in the session.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the session has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Run every merge job and package the results into one archive.
    ///
    /// Sections run strictly in order. A section missing its PO or
    /// Location aborts the whole batch; a section with no files is
    /// skipped with a notice. Upload limits apply per section.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for incomplete sections, rejected
    /// upload sets, duplicate entry names, or an empty result; merge
    /// failures propagate with the offending input named.
    pub fn process(&self) -> Result<BatchOutcome> {
        let mut archive = BatchArchive::new();
        let mut notices = Vec::new();

        for (idx, section) in self.sections.iter().enumerate() {
            let position = idx + 1;
            let po = section.po.trim();
            let location = section.location.trim();

            if po.is_empty() {
                return Err(ValidationError::IncompleteSection {
                    position,
                    field: "PO",
                }
                .into());
            }
            if location.is_empty() {
                return Err(ValidationError::IncompleteSection {
                    position,
                    field: "Location",
                }
                .into());
            }

            if section.files.is_empty() {
                tracing::warn!(position, po, "section has no files, skipping merge");
                notices.push(format!(
                    "Section {position} has no files selected. Skipping merge for this section."
                ));
                continue;
            }

            let set = UploadSet::validate(section.files.clone(), &self.limits)?;
            let sources: Vec<SourcePdf> = set
                .into_files()
                .into_iter()
                .map(|f| SourcePdf::new(f.filename, f.bytes))
                .collect();

            let merged = Merger::merge_to_bytes(&sources)?;
            let entry = archive.add(po, location, merged.bytes)?;
            tracing::info!(position, entry = %entry, pages = merged.page_count, "merged section");
        }

        if archive.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }

        let jobs_merged = archive.len();
        Ok(BatchOutcome {
            archive: archive.finish()?,
            jobs_merged,
            notices,
        })
    }
}
