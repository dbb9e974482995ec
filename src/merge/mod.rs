//! PDF merge engine.
//!
//! Concatenates an ordered sequence of PDF byte-streams into one output
//! document, preserving page order. The engine is stateless and never
//! touches the filesystem: a failed merge produces no output at all, and
//! error reporting identifies the offending input by name and position.

mod merger;

pub use merger::{MergedPdf, Merger, SourcePdf};
