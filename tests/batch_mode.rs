//! End-to-end tests for batch mode: sessions, merging, and ZIP packaging.

mod common;

use std::io::{Cursor, Read};

use pdfrelay::batch::BatchSession;
use pdfrelay::config::Limits;
use pdfrelay::error::{MergeError, RelayError};
use pdfrelay::intake::UploadedFile;
use lopdf::Document;

use common::pdf_bytes;

fn session_with(jobs: &[(&str, &str, Vec<UploadedFile>)]) -> BatchSession {
    let mut session = BatchSession::new(Limits::batch());
    let first = session.sections()[0].id();
    for (idx, (po, location, files)) in jobs.iter().enumerate() {
        let id = if idx == 0 { first } else { session.add_section() };
        let section = session.section_mut(id).unwrap();
        section.po = po.to_string();
        section.location = location.to_string();
        section.files = files.clone();
    }
    session
}

#[test]
fn two_jobs_produce_a_sorted_location_archive() {
    let session = session_with(&[
        (
            "ORD1",
            "NY",
            vec![
                UploadedFile::new("a.pdf", pdf_bytes(2)),
                UploadedFile::new("b.pdf", pdf_bytes(1)),
            ],
        ),
        (
            "ORD2",
            "LA",
            vec![UploadedFile::new("c.pdf", pdf_bytes(4))],
        ),
    ]);

    let outcome = session.process().unwrap();
    assert_eq!(outcome.jobs_merged, 2);
    assert!(outcome.notices.is_empty());
    assert_eq!(outcome.archive.filename, "LA-NY_Merged_Batch.zip");

    let mut zip = zip::ZipArchive::new(Cursor::new(outcome.archive.bytes)).unwrap();
    let names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, vec!["ORD1-NY.pdf", "ORD2-LA.pdf"]);

    // Each entry is itself a loadable PDF with the merged page count.
    let mut entry_bytes = Vec::new();
    zip.by_name("ORD1-NY.pdf")
        .unwrap()
        .read_to_end(&mut entry_bytes)
        .unwrap();
    let doc = Document::load_mem(&entry_bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 3);
}

#[test]
fn empty_section_is_skipped_with_a_notice() {
    let session = session_with(&[
        ("ORD1", "NY", vec![UploadedFile::new("a.pdf", pdf_bytes(1))]),
        ("ORD2", "LA", vec![]),
    ]);

    let outcome = session.process().unwrap();
    assert_eq!(outcome.jobs_merged, 1);
    assert_eq!(outcome.notices.len(), 1);
    assert!(outcome.notices[0].contains("Section 2"));
    assert_eq!(outcome.archive.filename, "NY_Merged_Batch.zip");
}

#[test]
fn corrupt_input_aborts_the_batch_naming_the_file() {
    let session = session_with(&[(
        "ORD1",
        "NY",
        vec![
            UploadedFile::new("good.pdf", pdf_bytes(1)),
            UploadedFile::new("bad.pdf", b"garbage".to_vec()),
        ],
    )]);

    match session.process() {
        Err(RelayError::Merge(MergeError::UnreadableInput { name, .. })) => {
            assert_eq!(name, "bad.pdf");
        }
        other => panic!("expected UnreadableInput, got {other:?}"),
    }
}

#[test]
fn per_section_limits_apply() {
    let files: Vec<UploadedFile> = (0..11)
        .map(|i| UploadedFile::new(format!("f{i}.pdf"), pdf_bytes(1)))
        .collect();
    let session = session_with(&[("ORD1", "NY", files)]);

    let result = session.process();
    assert!(matches!(
        result,
        Err(RelayError::Validation(
            pdfrelay::error::ValidationError::TooManyFiles { count: 11, max: 10 }
        ))
    ));
}

#[test]
fn duplicate_job_labels_are_rejected() {
    let session = session_with(&[
        ("ORD1", "NY", vec![UploadedFile::new("a.pdf", pdf_bytes(1))]),
        ("ORD1", "NY", vec![UploadedFile::new("b.pdf", pdf_bytes(1))]),
    ]);

    match session.process() {
        Err(RelayError::Validation(
            pdfrelay::error::ValidationError::DuplicateOutput { filename },
        )) => {
            assert_eq!(filename, "ORD1-NY.pdf");
        }
        other => panic!("expected DuplicateOutput, got {other:?}"),
    }
}
