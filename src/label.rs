//! Job label resolution.
//!
//! A job label names the consolidated document and, in single-job mode,
//! the email subject. It is extracted from the uploaded filenames: the
//! first name whose `.pdf`-stripped stem is not a generic placeholder
//! wins. When nothing qualifies, the caller falls back to a
//! timestamp-based label and surfaces a non-fatal notice.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::config::Stoplist;

/// Identifier for one merge job's output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobLabel(String);

/// How a [`JobLabel`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelSource {
    /// Extracted from an uploaded filename.
    Derived,
    /// Synthesized because no filename qualified.
    Fallback,
}

impl JobLabel {
    /// The label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Synthesize a fallback label from the current unix time.
    pub fn fallback() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(format!("MERGE-{seconds}"))
    }

    /// Filename of the consolidated document this label names.
    pub fn artifact_filename(&self) -> String {
        format!("{}_Consolidated_Document.pdf", sanitize_label(&self.0))
    }

    /// Subject line for the delivery email.
    pub fn email_subject(&self) -> String {
        format!("Order Id: {}", self.0)
    }
}

impl fmt::Display for JobLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scan filenames in order for the first usable label.
///
/// A filename qualifies when it ends in `.pdf` (case-insensitive), its
/// stripped stem is non-empty, and the stem is not in the stoplist.
/// Returns `None` when no filename qualifies.
pub fn resolve(filenames: impl IntoIterator<Item = impl AsRef<str>>, stoplist: &Stoplist) -> Option<JobLabel> {
    for name in filenames {
        let name = name.as_ref();
        let Some(stem) = strip_pdf_suffix(name) else {
            continue;
        };
        if stem.is_empty() || stoplist.contains(stem) {
            continue;
        }
        return Some(JobLabel(stem.to_string()));
    }
    None
}

/// Resolve a label or synthesize a fallback, reporting which happened.
pub fn resolve_or_fallback(
    filenames: impl IntoIterator<Item = impl AsRef<str>>,
    stoplist: &Stoplist,
) -> (JobLabel, LabelSource) {
    match resolve(filenames, stoplist) {
        Some(label) => (label, LabelSource::Derived),
        None => (JobLabel::fallback(), LabelSource::Fallback),
    }
}

/// Reduce a label to characters safe in batch entry names: anything
/// outside `[A-Za-z0-9-]` is removed entirely.
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

fn strip_pdf_suffix(name: &str) -> Option<&str> {
    let bytes = name.as_bytes();
    if bytes.len() >= 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".pdf") {
        Some(&name[..name.len() - 4])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_generic_filename_wins() {
        let stoplist = Stoplist::default();
        let label = resolve(["scan.pdf", "document.pdf", "ORD-9912.pdf"], &stoplist);
        assert_eq!(label.unwrap().as_str(), "ORD-9912");
    }

    #[test]
    fn all_generic_names_yield_none() {
        let stoplist = Stoplist::default();
        assert!(resolve(["scan.pdf", "file.pdf"], &stoplist).is_none());
    }

    #[test]
    fn stoplist_match_is_case_insensitive() {
        let stoplist = Stoplist::default();
        assert!(resolve(["Scan.pdf", "FILE.PDF"], &stoplist).is_none());
    }

    #[test]
    fn non_pdf_names_are_skipped() {
        let stoplist = Stoplist::default();
        let label = resolve(["readme.txt", "ORD-1.pdf"], &stoplist);
        assert_eq!(label.unwrap().as_str(), "ORD-1");
    }

    #[test]
    fn first_match_wins_over_later_candidates() {
        let stoplist = Stoplist::default();
        let label = resolve(["ORD-1.pdf", "ORD-2.pdf"], &stoplist);
        assert_eq!(label.unwrap().as_str(), "ORD-1");
    }

    #[test]
    fn fallback_label_has_merge_prefix() {
        let (label, source) = resolve_or_fallback(["file.pdf"], &Stoplist::default());
        assert!(label.as_str().starts_with("MERGE-"));
        assert_eq!(source, LabelSource::Fallback);
    }

    #[test]
    fn derived_label_reports_its_source() {
        let (label, source) = resolve_or_fallback(["ORD-7.pdf"], &Stoplist::default());
        assert_eq!(label.as_str(), "ORD-7");
        assert_eq!(source, LabelSource::Derived);
    }

    #[test]
    fn artifact_filename_format() {
        let (label, _) = resolve_or_fallback(["ORD-9912.pdf"], &Stoplist::default());
        assert_eq!(
            label.artifact_filename(),
            "ORD-9912_Consolidated_Document.pdf"
        );
        assert_eq!(label.email_subject(), "Order Id: ORD-9912");
    }

    #[test]
    fn label_sanitizer_strips_everything_else() {
        assert_eq!(sanitize_label("ORD 12/34_5"), "ORD12345");
        assert_eq!(sanitize_label("NewYork-BldgA"), "NewYork-BldgA");
    }
}
