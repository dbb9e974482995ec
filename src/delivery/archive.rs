//! Batch archive packaging.
//!
//! Merged batch outputs accumulate in a [`BatchArchive`] and are packaged
//! into one Deflate-compressed ZIP, one entry per job with no directory
//! nesting. The archive filename is derived from the sorted set of unique
//! job locations. Packaging is purely in-memory: no network, no
//! filesystem writes.

use std::collections::{BTreeSet, HashSet};
use std::io::{Cursor, Write};

use crate::error::{RelayError, Result, ValidationError};
use crate::label::sanitize_label;

/// MIME type of a finished batch archive.
pub const ZIP_MIME: &str = "application/zip";

const ARCHIVE_SUFFIX: &str = "_Merged_Batch.zip";

/// A finished, downloadable archive.
#[derive(Debug, Clone)]
pub struct Archive {
    /// Derived archive filename.
    pub filename: String,
    /// ZIP container bytes.
    pub bytes: Vec<u8>,
}

/// Accumulator for merged batch outputs.
#[derive(Debug, Default)]
pub struct BatchArchive {
    entries: Vec<(String, Vec<u8>)>,
    seen_names: HashSet<String>,
    locations: BTreeSet<String>,
}

impl BatchArchive {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry filename for a job, from its sanitized PO and location.
    pub fn job_filename(po: &str, location: &str) -> String {
        format!("{}-{}.pdf", sanitize_label(po), sanitize_label(location))
    }

    /// Add one merged job to the archive.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateOutput`] when two jobs resolve
    /// to the same entry filename.
    pub fn add(&mut self, po: &str, location: &str, bytes: Vec<u8>) -> Result<String> {
        let filename = Self::job_filename(po, location);
        if !self.seen_names.insert(filename.clone()) {
            return Err(ValidationError::DuplicateOutput { filename }.into());
        }

        self.locations.insert(sanitize_label(location));
        self.entries.push((filename.clone(), bytes));
        Ok(filename)
    }

    /// Number of accumulated jobs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no job has been added yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Package the accumulated jobs into one ZIP.
    ///
    /// The filename joins the sorted, deduplicated locations with `-` and
    /// appends a fixed suffix.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Archive`] if the ZIP writer fails.
    pub fn finish(self) -> Result<Archive> {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let options = zip::write::FileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);

            for (filename, bytes) in &self.entries {
                zip.start_file(filename.as_str(), options)
                    .map_err(|e| RelayError::archive(e.to_string()))?;
                zip.write_all(bytes)
                    .map_err(|e| RelayError::archive(e.to_string()))?;
            }

            zip.finish()
                .map_err(|e| RelayError::archive(e.to_string()))?;
        }

        let joined = self
            .locations
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join("-");

        Ok(Archive {
            filename: format!("{joined}{ARCHIVE_SUFFIX}"),
            bytes: buffer,
        })
    }
}
