//! Upload intake and validation.
//!
//! An [`UploadSet`] can only be obtained through [`UploadSet::validate`],
//! which enforces the three intake invariants in a fixed order: file
//! count, per-file extension, cumulative size. The first violation found
//! is the one reported, and a rejected set performs no staging writes.

use crate::config::Limits;
use crate::error::ValidationError;

/// One submitted file: its original name and raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as submitted by the client.
    pub filename: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Create an upload from a name and its content.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A validated, ordered group of PDF uploads for one merge job.
#[derive(Debug)]
pub struct UploadSet {
    files: Vec<UploadedFile>,
}

impl UploadSet {
    /// Validate a candidate set against the given limits.
    ///
    /// Checks, in order:
    /// 1. count within `1..=max_file_count`,
    /// 2. every filename carries a `.pdf` extension (first offender named),
    /// 3. cumulative size within `max_combined_bytes` (reported as soon as
    ///    the running total crosses the limit).
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] detected; on rejection the
    /// candidate files are dropped and nothing has been staged.
    pub fn validate(files: Vec<UploadedFile>, limits: &Limits) -> Result<Self, ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::NoFiles);
        }
        if files.len() > limits.max_file_count {
            return Err(ValidationError::TooManyFiles {
                count: files.len(),
                max: limits.max_file_count,
            });
        }

        let mut total_bytes = 0u64;
        for file in &files {
            if !has_pdf_extension(&file.filename) {
                return Err(ValidationError::NotAPdf {
                    filename: file.filename.clone(),
                });
            }

            total_bytes += file.size();
            if total_bytes > limits.max_combined_bytes {
                return Err(ValidationError::SizeExceeded {
                    total_bytes,
                    limit_bytes: limits.max_combined_bytes,
                });
            }
        }

        Ok(Self { files })
    }

    /// The accepted files, in submission order.
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    /// Filenames in submission order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.filename.as_str())
    }

    /// Number of files in the set.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the set is empty (never true for a validated set).
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Cumulative size of the set in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(UploadedFile::size).sum()
    }

    /// Consume the set, yielding the files.
    pub fn into_files(self) -> Vec<UploadedFile> {
        self.files
    }
}

/// Whether a filename carries a `.pdf` extension, case-insensitively.
pub fn has_pdf_extension(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && ext.eq_ignore_ascii_case("pdf"),
        None => false,
    }
}

/// Reduce a client-supplied filename to something safe to write to disk.
///
/// Drops any path components, replaces characters outside
/// `[A-Za-z0-9._-]` with underscores, and strips leading dots so the
/// result can never escape the staging directory or hide itself.
pub fn sanitize_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn upload(name: &str, len: usize) -> UploadedFile {
        UploadedFile::new(name, vec![0u8; len])
    }

    fn limits(count: usize, bytes: u64) -> Limits {
        Limits {
            max_file_count: count,
            max_combined_bytes: bytes,
        }
    }

    #[test]
    fn accepts_a_valid_set() {
        let set = UploadSet::validate(
            vec![upload("a.pdf", 10), upload("b.PDF", 20)],
            &limits(5, 100),
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.total_bytes(), 30);
    }

    #[test]
    fn rejects_an_empty_set() {
        let result = UploadSet::validate(vec![], &limits(5, 100));
        assert!(matches!(result, Err(ValidationError::NoFiles)));
    }

    #[test]
    fn rejects_too_many_files() {
        let files = (0..3).map(|i| upload(&format!("f{i}.pdf"), 1)).collect();
        let result = UploadSet::validate(files, &limits(2, 100));
        assert!(matches!(
            result,
            Err(ValidationError::TooManyFiles { count: 3, max: 2 })
        ));
    }

    #[test]
    fn rejects_wrong_type_naming_the_file() {
        let result = UploadSet::validate(
            vec![upload("a.pdf", 1), upload("notes.txt", 1)],
            &limits(5, 100),
        );
        match result {
            Err(ValidationError::NotAPdf { filename }) => assert_eq!(filename, "notes.txt"),
            other => panic!("expected NotAPdf, got {other:?}"),
        }
    }

    #[test]
    fn rejects_size_over_limit_with_actual_total() {
        let result = UploadSet::validate(
            vec![upload("a.pdf", 60), upload("b.pdf", 50)],
            &limits(5, 100),
        );
        match result {
            Err(ValidationError::SizeExceeded {
                total_bytes,
                limit_bytes,
            }) => {
                assert_eq!(total_bytes, 110);
                assert_eq!(limit_bytes, 100);
            }
            other => panic!("expected SizeExceeded, got {other:?}"),
        }
    }

    #[test]
    fn count_violation_wins_over_type_violation() {
        // Both violations present; count is checked first.
        let files = vec![upload("a.txt", 1), upload("b.txt", 1), upload("c.txt", 1)];
        let result = UploadSet::validate(files, &limits(2, 100));
        assert!(matches!(result, Err(ValidationError::TooManyFiles { .. })));
    }

    #[test]
    fn type_violation_wins_over_size_violation() {
        // The offending extension appears before the size limit is crossed.
        let result = UploadSet::validate(
            vec![upload("a.txt", 60), upload("b.pdf", 60)],
            &limits(5, 100),
        );
        assert!(matches!(result, Err(ValidationError::NotAPdf { .. })));
    }

    #[rstest]
    #[case("report.pdf", true)]
    #[case("report.PDF", true)]
    #[case("report.Pdf", true)]
    #[case("report.txt", false)]
    #[case("report", false)]
    #[case(".pdf", false)]
    fn pdf_extension_detection(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(has_pdf_extension(name), expected);
    }

    #[rstest]
    #[case("invoice 2024.pdf", "invoice_2024.pdf")]
    #[case("../../etc/passwd", "passwd")]
    #[case("..\\evil.pdf", "evil.pdf")]
    #[case("ORD-9912.pdf", "ORD-9912.pdf")]
    #[case("...", "unnamed")]
    fn filename_sanitization(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename(input), expected);
    }
}
