//! pdfrelay - Merge uploaded PDF files and deliver the result.
//!
//! This library concatenates a set of PDF inputs into one consolidated
//! document, derives a job label from the input filenames, and delivers
//! the result either as a single-attachment email (single-job mode) or as
//! entries in one downloadable ZIP archive (batch mode). It provides:
//!
//! - Intake validation (file count, type, and combined-size limits)
//! - Job label resolution with a configurable stoplist and a
//!   timestamp fallback
//! - Atomic in-memory PDF merging with per-input error attribution
//! - SMTP delivery behind a transport trait, degrading to a download
//!   path on failure
//! - Batch sessions with stable section identifiers and ZIP packaging
//!
//! # Examples
//!
//! ## Single job
//!
//! ```no_run
//! use pdfrelay::config::AppConfig;
//! use pdfrelay::intake::UploadedFile;
//! use pdfrelay::pipeline::OrderProcessor;
//!
//! # async fn example() -> pdfrelay::Result<()> {
//! let processor = OrderProcessor::new(AppConfig::from_env());
//! let files = vec![UploadedFile::new("ORD-9912.pdf", std::fs::read("ORD-9912.pdf")?)];
//!
//! let outcome = processor.process("customer@example.com", files).await?;
//! println!("merged {} pages as {}", outcome.page_count, outcome.artifact_filename);
//! # Ok(())
//! # }
//! ```
//!
//! ## Batch mode
//!
//! ```no_run
//! use pdfrelay::batch::BatchSession;
//! use pdfrelay::config::Limits;
//! use pdfrelay::intake::UploadedFile;
//!
//! # fn example() -> pdfrelay::Result<()> {
//! let mut session = BatchSession::new(Limits::batch());
//! let id = session.sections()[0].id();
//! let section = session.section_mut(id).unwrap();
//! section.po = "ORD1".to_string();
//! section.location = "NY".to_string();
//! section.files.push(UploadedFile::new("a.pdf", std::fs::read("a.pdf")?));
//!
//! let outcome = session.process()?;
//! println!("archive: {}", outcome.archive.filename);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod cli;
pub mod config;
pub mod delivery;
pub mod error;
pub mod intake;
pub mod io;
pub mod label;
pub mod merge;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use error::{DeliveryError, MergeError, RelayError, Result, ValidationError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
