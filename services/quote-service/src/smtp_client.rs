//! SMTP Client
//!
//! Sends appointment emails via SMTP using lettre.

use async_trait::async_trait;
use grooming_models::{OutboundEmail, DEFAULT_CONTENT_TYPE};
use grooming_utils::{EmailConfig, GroomingError, GroomingResult};
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

/// Delivers one email. Implementations make a single attempt and never retry.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn send(&self, email: OutboundEmail) -> GroomingResult<()>;
}

/// SMTP client for sending emails
pub struct SmtpClient {
    config: EmailConfig,
}

impl SmtpClient {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Builds the transport on every send so missing credentials surface as an
    /// error on the request instead of at startup.
    fn transport(&self) -> GroomingResult<AsyncSmtpTransport<Tokio1Executor>> {
        let (username, password) = self
            .config
            .credentials()
            .ok_or_else(|| GroomingError::configuration("SMTP credentials are not set"))?;

        let builder = if self.config.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
        }
        .map_err(|e| GroomingError::configuration(format!("Failed to create SMTP transport: {}", e)))?;

        Ok(builder
            .port(self.config.smtp_port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build())
    }
}

/// Converts an `OutboundEmail` into a MIME message: an HTML/plain-text
/// alternative, wrapped in `multipart/mixed` when there are attachments.
pub fn build_message(email: OutboundEmail) -> GroomingResult<Message> {
    let from: Mailbox = email
        .from
        .parse()
        .map_err(|e| GroomingError::configuration(format!("Invalid from address: {}", e)))?;

    let to: Mailbox = email
        .to
        .parse()
        .map_err(|e| GroomingError::configuration(format!("Invalid to address: {}", e)))?;

    let content = MultiPart::alternative_plain_html(email.body_text, email.body_html);

    let body = if email.attachments.is_empty() {
        content
    } else {
        let mut mixed = MultiPart::mixed().multipart(content);
        for attachment in email.attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .or_else(|_| ContentType::parse(DEFAULT_CONTENT_TYPE))
                .map_err(|e| GroomingError::internal(format!("Invalid content type: {}", e)))?;

            mixed = mixed.singlepart(Attachment::new(attachment.file_name).body(attachment.data, content_type));
        }
        mixed
    };

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject)
        .multipart(body)
        .map_err(|e| GroomingError::internal(format!("Failed to build email: {}", e)))
}

#[async_trait]
impl MailTransport for SmtpClient {
    async fn send(&self, email: OutboundEmail) -> GroomingResult<()> {
        let mailer = self.transport()?;
        let message = build_message(email)?;

        let response = mailer
            .send(message)
            .await
            .map_err(|e| GroomingError::email_delivery(format!("Failed to send email: {}", e)))?;

        debug!(
            code = %response.code(),
            message = %response.message().map(|line| line.to_string()).collect::<Vec<_>>().join(" "),
            "SMTP server accepted message"
        );
        Ok(())
    }
}
