//! Small helpers: CLI input expansion and size formatting.

use std::path::PathBuf;

use crate::error::Result;

/// Expand glob patterns into filesystem paths, preserving pattern order.
///
/// A pattern that matches nothing but names an existing file is taken
/// literally, so plain filenames work without shell-side globbing.
///
/// # Errors
///
/// Propagates glob parse errors and filesystem errors from the glob
/// iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let mut matched = false;

        for entry in glob::glob(pattern)? {
            resolved.push(entry?);
            matched = true;
        }

        if !matched {
            let literal = PathBuf::from(pattern);
            if literal.exists() {
                resolved.push(literal);
            }
        }
    }

    Ok(resolved)
}

/// Format a byte count as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
