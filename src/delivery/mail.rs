//! Outbound mail: a transport trait plus the SMTP implementation.
//!
//! The pipeline talks to [`MailTransport`] only, so tests can substitute
//! a transport without a network. [`SmtpMailer`] is the production
//! implementation: one authenticated STARTTLS session, one attempt, no
//! retry.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::SmtpConfig;
use crate::error::DeliveryError;

/// One outgoing message with a single PDF attachment.
#[derive(Debug)]
pub struct OutgoingMail<'a> {
    /// Recipient address.
    pub to: &'a str,
    /// Subject line.
    pub subject: &'a str,
    /// Plain-text body.
    pub body: &'a str,
    /// Attachment filename shown to the recipient.
    pub attachment_name: &'a str,
    /// Attachment content.
    pub attachment: &'a [u8],
}

/// Narrow mail-sending boundary consumed by the pipeline.
pub trait MailTransport: Send + Sync {
    /// Transmit one message.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] on any failure; the success value is a
    /// human-readable confirmation message.
    fn send(&self, mail: &OutgoingMail<'_>) -> Result<String, DeliveryError>;
}

/// SMTP-backed [`MailTransport`].
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Create a mailer for the given settings.
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
        address
            .parse()
            .map_err(|e: lettre::address::AddressError| DeliveryError::InvalidAddress {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }

    fn compose(&self, mail: &OutgoingMail<'_>) -> Result<Message, DeliveryError> {
        let pdf_type =
            ContentType::parse("application/pdf").map_err(|e| DeliveryError::Compose {
                reason: e.to_string(),
            })?;

        Message::builder()
            .from(Self::mailbox(&self.config.sender)?)
            .to(Self::mailbox(mail.to)?)
            .subject(mail.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(mail.body.to_string()))
                    .singlepart(
                        Attachment::new(mail.attachment_name.to_string())
                            .body(mail.attachment.to_vec(), pdf_type),
                    ),
            )
            .map_err(|e| DeliveryError::Compose {
                reason: e.to_string(),
            })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, mail: &OutgoingMail<'_>) -> Result<String, DeliveryError> {
        if !self.config.is_complete() {
            return Err(DeliveryError::IncompleteConfig);
        }

        let message = self.compose(mail)?;

        let mailer = SmtpTransport::starttls_relay(&self.config.server)
            .map_err(|e| DeliveryError::Transport {
                reason: e.to_string(),
            })?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        mailer
            .send(&message)
            .map_err(|e| DeliveryError::Transport {
                reason: e.to_string(),
            })?;

        Ok("Email sent successfully.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            server: "smtp.example.com".to_string(),
            port: 587,
            username: "orders@example.com".to_string(),
            password: "app-password".to_string(),
            sender: "orders@example.com".to_string(),
        }
    }

    fn mail<'a>(to: &'a str) -> OutgoingMail<'a> {
        OutgoingMail {
            to,
            subject: "Order Id: ORD-1",
            body: "body",
            attachment_name: "ORD-1_Consolidated_Document.pdf",
            attachment: b"pdf",
        }
    }

    #[test]
    fn incomplete_config_fails_before_any_network_io() {
        let mut incomplete = config();
        incomplete.password.clear();
        let mailer = SmtpMailer::new(incomplete);

        let result = mailer.send(&mail("customer@example.com"));
        assert!(matches!(result, Err(DeliveryError::IncompleteConfig)));
    }

    #[test]
    fn invalid_recipient_is_rejected_at_compose_time() {
        let mailer = SmtpMailer::new(config());
        let result = mailer.compose(&mail("not-an-address"));
        match result {
            Err(DeliveryError::InvalidAddress { address, .. }) => {
                assert_eq!(address, "not-an-address");
            }
            other => panic!("expected InvalidAddress, got {other:?}"),
        }
    }

    #[test]
    fn compose_builds_a_multipart_message() {
        let mailer = SmtpMailer::new(config());
        let message = mailer.compose(&mail("customer@example.com")).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("Order Id: ORD-1"));
        assert!(raw.contains("ORD-1_Consolidated_Document.pdf"));
        assert!(raw.contains("application/pdf"));
    }
}
