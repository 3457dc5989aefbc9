//! Quote Service
//!
//! Turns a parsed submission into the operator notification email and hands it
//! to the mail transport.

use chrono::NaiveDateTime;
use grooming_models::{AppointmentRequest, FileAttachment, OutboundEmail};
use grooming_utils::{EmailConfig, GroomingResult};
use std::sync::Arc;
use tracing::info;

use crate::smtp_client::MailTransport;
use crate::submission::QuoteSubmission;
use crate::template_engine::TemplateEngine;

type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Appointment request mailer
#[derive(Clone)]
pub struct QuoteService {
    template_engine: Arc<TemplateEngine>,
    mailer: Arc<dyn MailTransport>,
    email_config: Arc<EmailConfig>,
    clock: Clock,
}

impl QuoteService {
    pub fn new(email_config: EmailConfig, mailer: Arc<dyn MailTransport>) -> Self {
        Self {
            template_engine: Arc::new(TemplateEngine::new()),
            mailer,
            email_config: Arc::new(email_config),
            clock: Arc::new(|| chrono::Local::now().naive_local()),
        }
    }

    /// Replaces the source of the "submitted on" timestamp.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Builds the notification email without sending it.
    pub fn compose_email(
        &self,
        request: &AppointmentRequest,
        attachments: Vec<FileAttachment>,
    ) -> GroomingResult<OutboundEmail> {
        let submitted_at = (self.clock)();

        Ok(OutboundEmail {
            from: self.email_config.sender_mailbox()?,
            to: self.email_config.recipient()?,
            subject: self.template_engine.render_subject(request),
            body_html: self.template_engine.render_body(request, submitted_at)?,
            body_text: self.template_engine.render_text(request, submitted_at)?,
            attachments,
        })
    }

    /// Composes and sends one email for the submission. A failed send is
    /// reported as-is; there is no retry.
    pub async fn submit_request(&self, submission: QuoteSubmission) -> GroomingResult<()> {
        let (request, attachments) = submission.into_attachments();
        let email = self.compose_email(&request, attachments)?;

        let attachment_count = email.attachments.len();
        let attachment_bytes = email.total_attachment_size();
        let subject = email.subject.clone();

        self.mailer.send(email).await?;

        info!(
            subject = %subject,
            dog_name = %request.dog_name,
            first_available = request.is_first_available(),
            attachment_count,
            attachment_bytes,
            "Appointment request emailed"
        );
        Ok(())
    }
}
