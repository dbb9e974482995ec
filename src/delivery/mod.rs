//! Delivery dispatch: email hand-off for single jobs, ZIP packaging for
//! batches.

pub mod archive;
pub mod mail;

pub use archive::{Archive, BatchArchive, ZIP_MIME};
pub use mail::{MailTransport, OutgoingMail, SmtpMailer};
