//! Shared helpers for integration tests: minimal PDF generation and
//! scripted mail transports.

// Not every test file uses every helper.
#![allow(dead_code)]

use std::sync::Mutex;

use lopdf::{Document, Object, Stream, dictionary};
use pdfrelay::delivery::{MailTransport, OutgoingMail};
use pdfrelay::error::DeliveryError;

/// Build a minimal, structurally valid PDF with the given page count and
/// return its serialized bytes.
pub fn pdf_bytes(pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let mut kids = Vec::new();

    let resources_id = doc.add_object(Object::Dictionary(dictionary! {
        "ProcSet" => Object::Array(vec![Object::Name(b"PDF".to_vec())]),
    }));

    for _ in 0..pages {
        let content_id = doc.add_object(Object::Stream(Stream::new(dictionary! {}, vec![])));
        let page_id = doc.add_object(Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Page".to_vec()),
            "MediaBox" => Object::Array(vec![0.into(), 0.into(), 595.into(), 842.into()]),
            "Resources" => Object::Reference(resources_id),
            "Contents" => Object::Reference(content_id),
        }));
        kids.push(Object::Reference(page_id));
    }

    let pages_id = doc.add_object(Object::Dictionary(dictionary! {
        "Type" => Object::Name(b"Pages".to_vec()),
        "Kids" => Object::Array(kids),
        "Count" => Object::Integer(pages as i64),
    }));

    for (_, page_id) in doc.get_pages() {
        if let Some(Object::Dictionary(dict)) = doc.objects.get_mut(&page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let catalog_id = doc.add_object(Object::Dictionary(dictionary! {
        "Type" => Object::Name(b"Catalog".to_vec()),
        "Pages" => Object::Reference(pages_id),
    }));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize test PDF");
    bytes
}

/// A send the mailer observed.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub attachment_name: String,
    pub attachment_len: usize,
}

/// Transport that records every send and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
}

impl MailTransport for RecordingMailer {
    fn send(&self, mail: &OutgoingMail<'_>) -> Result<String, DeliveryError> {
        self.sent.lock().unwrap().push(SentMail {
            to: mail.to.to_string(),
            subject: mail.subject.to_string(),
            attachment_name: mail.attachment_name.to_string(),
            attachment_len: mail.attachment.len(),
        });
        Ok("Email sent successfully.".to_string())
    }
}

/// Transport that always fails, simulating an unreachable SMTP server.
#[derive(Debug, Default)]
pub struct FailingMailer;

impl MailTransport for FailingMailer {
    fn send(&self, _mail: &OutgoingMail<'_>) -> Result<String, DeliveryError> {
        Err(DeliveryError::Transport {
            reason: "connection refused".to_string(),
        })
    }
}
