//! Command-line interface for pdfrelay.
//!
//! Two subcommands drive the same pipeline the library exposes:
//!
//! - `send`: merge PDFs and email the consolidated document to one
//!   recipient. SMTP settings come from the environment.
//! - `batch`: run the merge jobs described in a JSON manifest and write
//!   one ZIP archive.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use crate::batch::BatchSession;
use crate::config::{AppConfig, Limits, SmtpConfig, Stoplist, Workspace};
use crate::intake::UploadedFile;
use crate::pipeline::{Delivery, OrderProcessor};
use crate::utils::{collect_paths_for_patterns, format_file_size};

/// Merge PDF files and deliver them by email or ZIP archive.
#[derive(Parser, Debug)]
#[command(name = "pdfrelay")]
#[command(version)]
#[command(about = "Merge PDF files and deliver them by email or ZIP archive", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge PDFs and email the consolidated document
    Send(SendArgs),
    /// Run multiple merge jobs from a manifest and package them into one ZIP
    Batch(BatchArgs),
}

/// Arguments for the `send` subcommand.
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Input PDF files or glob patterns (merged in order)
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Recipient email address
    #[arg(short, long, value_name = "ADDRESS")]
    pub to: String,

    /// Staging directory for transient inputs
    #[arg(long, value_name = "DIR", env = "UPLOAD_FOLDER", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Output directory for merged artifacts
    #[arg(long, value_name = "DIR", env = "OUTPUT_FOLDER", default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Maximum number of input files
    #[arg(long, value_name = "N", env = "MAX_FILE_COUNT", default_value_t = 15)]
    pub max_files: usize,

    /// Maximum combined input size in megabytes
    #[arg(long, value_name = "MB", env = "MAX_COMBINED_SIZE_MB", default_value_t = 25)]
    pub max_size_mb: u64,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSON manifest describing the merge jobs
    ///
    /// Format:
    ///   { "sections": [ { "po": "ORD1", "location": "NY",
    ///                     "files": ["a.pdf", "b.pdf"] } ] }
    #[arg(short, long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Directory the finished ZIP is written to
    #[arg(long, value_name = "DIR", env = "OUTPUT_FOLDER", default_value = "outputs")]
    pub output_dir: PathBuf,
}

/// One manifest entry for batch mode.
#[derive(Debug, Deserialize)]
pub struct ManifestSection {
    /// Purchase-order label.
    pub po: String,
    /// Location label.
    pub location: String,
    /// Paths of the PDFs to merge for this job.
    pub files: Vec<PathBuf>,
}

/// Parsed batch manifest.
#[derive(Debug, Deserialize)]
pub struct BatchManifest {
    /// Job sections, in order.
    pub sections: Vec<ManifestSection>,
}

/// Parse arguments and run the selected subcommand.
///
/// # Errors
///
/// Returns any pipeline, I/O, or manifest error, wrapped with context
/// suitable for terminal display.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Send(args) => run_send(args).await,
        Command::Batch(args) => run_batch(args).await,
    }
}

async fn run_send(args: SendArgs) -> anyhow::Result<()> {
    let paths = collect_paths_for_patterns(&args.inputs)?;
    if paths.is_empty() {
        anyhow::bail!("No input files matched the given patterns");
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read input: {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        files.push(UploadedFile::new(filename, bytes));
    }

    let total: u64 = files.iter().map(UploadedFile::size).sum();
    println!(
        "Merging {} PDF files ({})...",
        files.len(),
        format_file_size(total)
    );

    let config = AppConfig {
        limits: Limits::new(args.max_files, args.max_size_mb),
        smtp: SmtpConfig::from_env(),
        workspace: Workspace::new(args.upload_dir, args.output_dir),
        stoplist: Stoplist::from_env(),
    };

    let processor = OrderProcessor::new(config);
    let outcome = processor.process(&args.to, files).await?;

    println!(
        "Order Id: {} ({} pages merged)",
        outcome.label, outcome.page_count
    );
    match outcome.delivery {
        Delivery::Emailed { message } => {
            println!("✓ {message} Files merged and emailed to {}.", args.to);
        }
        Delivery::DownloadOnly { reason } => {
            println!("✗ Merge successful, but email failed: {reason}");
            println!(
                "  The merged document was kept for manual download: {}",
                processor
                    .artifacts()
                    .path_of(&outcome.artifact_filename)?
                    .display()
            );
        }
    }

    Ok(())
}

async fn run_batch(args: BatchArgs) -> anyhow::Result<()> {
    let raw = tokio::fs::read(&args.manifest)
        .await
        .with_context(|| format!("Failed to read manifest: {}", args.manifest.display()))?;
    let manifest: BatchManifest =
        serde_json::from_slice(&raw).context("Failed to parse batch manifest")?;

    if manifest.sections.is_empty() {
        anyhow::bail!("Manifest contains no sections");
    }

    let mut session = BatchSession::new(Limits::batch());
    let first = session.sections()[0].id();
    for (idx, entry) in manifest.sections.iter().enumerate() {
        let id = if idx == 0 { first } else { session.add_section() };
        let mut files = Vec::with_capacity(entry.files.len());
        for path in &entry.files {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read input: {}", path.display()))?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            files.push(UploadedFile::new(filename, bytes));
        }

        let section = session
            .section_mut(id)
            .expect("freshly added section exists");
        section.po = entry.po.clone();
        section.location = entry.location.clone();
        section.files = files;
    }

    let outcome = tokio::task::spawn_blocking(move || session.process()).await??;

    for notice in &outcome.notices {
        println!("! {notice}");
    }

    tokio::fs::create_dir_all(&args.output_dir).await?;
    let archive_path = args.output_dir.join(&outcome.archive.filename);
    tokio::fs::write(&archive_path, &outcome.archive.bytes).await?;

    println!(
        "✓ Successfully processed {} merge jobs ({})",
        outcome.jobs_merged,
        format_file_size(outcome.archive.bytes.len() as u64)
    );
    println!("  Archive: {}", archive_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn send_args_parse_with_defaults() {
        let cli = Cli::parse_from([
            "pdfrelay", "send", "--to", "customer@example.com", "a.pdf", "b.pdf",
        ]);
        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.inputs, vec!["a.pdf", "b.pdf"]);
                assert_eq!(args.to, "customer@example.com");
                assert_eq!(args.max_files, 15);
                assert_eq!(args.max_size_mb, 25);
            }
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn batch_args_require_a_manifest() {
        let result = Cli::try_parse_from(["pdfrelay", "batch"]);
        assert!(result.is_err());
    }

    #[test]
    fn manifest_deserializes() {
        let manifest: BatchManifest = serde_json::from_str(
            r#"{ "sections": [ { "po": "ORD1", "location": "NY", "files": ["a.pdf"] } ] }"#,
        )
        .unwrap();
        assert_eq!(manifest.sections.len(), 1);
        assert_eq!(manifest.sections[0].po, "ORD1");
    }
}
