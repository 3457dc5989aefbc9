//! Quote submission client
//!
//! Posts a validated form to the quote service as `multipart/form-data`.

use grooming_models::{FileAttachment, SubmissionResponse};
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::state::{AppointmentForm, FormError, SubmissionPayload};

pub const QUOTE_PATH: &str = "/api/quote";

/// Shown when the server gave no usable reason for a failure.
pub const GENERIC_SUBMIT_FAILURE: &str = "Failed to send appointment request. Please try again.";

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("A submission is already in progress")]
    InFlight,

    #[error("Could not attach {file_name}")]
    Attachment {
        file_name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("{}", GENERIC_SUBMIT_FAILURE)]
    Network(#[from] reqwest::Error),
}

impl SubmitError {
    /// Whether the form was refused locally without contacting the server.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Form(_) | Self::InFlight | Self::Attachment { .. })
    }
}

/// HTTP client for the quote endpoint
#[derive(Debug, Clone)]
pub struct QuoteClient {
    client: Client,
    base_url: String,
}

impl QuoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, QUOTE_PATH)
    }

    /// Validates and sends the form. On success the form is reset; on any
    /// failure it is left as it was so the user can try again.
    pub async fn submit(&self, form: &mut AppointmentForm) -> Result<(), SubmitError> {
        if !form.is_submit_enabled() {
            return Err(SubmitError::InFlight);
        }
        let payload = form.build_submission_payload()?;
        let file_count = payload.documents.len() + payload.dog_photo.iter().count();
        let total_size = payload.total_size();

        let result = {
            let _in_flight = SubmitGuard::begin(form);
            self.post(payload).await
        };

        match result {
            Ok(()) => {
                info!(file_count, total_size, "Appointment request submitted");
                form.reset();
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "Appointment request was not accepted");
                Err(error)
            }
        }
    }

    async fn post(&self, payload: SubmissionPayload) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(self.endpoint())
            .multipart(multipart_form(payload)?)
            .send()
            .await?;

        let status = response.status();
        let body = response.json::<SubmissionResponse>().await.ok();

        match body {
            Some(body) if status.is_success() && body.success => Ok(()),
            body => Err(SubmitError::Rejected {
                status: status.as_u16(),
                message: body
                    .and_then(|b| b.error)
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_SUBMIT_FAILURE.to_string()),
            }),
        }
    }
}

/// Disables the form's submit control until dropped, so a cancelled
/// submission re-enables it too.
struct SubmitGuard<'a> {
    form: &'a mut AppointmentForm,
}

impl<'a> SubmitGuard<'a> {
    fn begin(form: &'a mut AppointmentForm) -> Self {
        form.set_submitting(true);
        Self { form }
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.form.set_submitting(false);
    }
}

/// Text fields first, then `documents_0..N`, then `dogPhoto`. The boundary is
/// chosen by reqwest.
pub fn multipart_form(payload: SubmissionPayload) -> Result<Form, SubmitError> {
    let mut form = Form::new();
    for (name, value) in payload.fields {
        form = form.text(name, value);
    }
    for (index, document) in payload.documents.into_iter().enumerate() {
        form = form.part(grooming_models::wire::document_key(index), file_part(document)?);
    }
    if let Some(photo) = payload.dog_photo {
        form = form.part(grooming_models::wire::DOG_PHOTO, file_part(photo)?);
    }
    Ok(form)
}

fn file_part(file: FileAttachment) -> Result<Part, SubmitError> {
    let FileAttachment {
        file_name,
        content_type,
        data,
    } = file;

    Part::bytes(data)
        .file_name(file_name.clone())
        .mime_str(&content_type)
        .map_err(|source| SubmitError::Attachment { file_name, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FileTarget, FormField};
    use grooming_models::MainService;
    use std::time::Duration;

    fn filled_form() -> AppointmentForm {
        let mut form = AppointmentForm::new();
        form.update_field(FormField::FirstName, "Dana");
        form.update_field(FormField::LastName, "Whitfield");
        form.update_field(FormField::Phone, "(832) 555-0142");
        form.update_field(FormField::Email, "dana@example.com");
        form.update_field(FormField::DogName, "Biscuit");
        form.update_field(FormField::DogBreed, "Goldendoodle");
        form.update_field(FormField::DogWeight, "45");
        form.update_field(FormField::DogAge, "3");
        form.select_main_service(MainService::FullGroom);
        form.set_first_available(true);
        form.add_files(
            vec![FileAttachment::new("rabies.pdf", "application/pdf", vec![1; 32])],
            FileTarget::Documents,
        );
        form
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            QuoteClient::new("http://localhost:3000/").endpoint(),
            "http://localhost:3000/api/quote"
        );
    }

    #[test]
    fn test_validation_fails_before_network() {
        // Nothing listens on the discard port; a request would fail differently.
        let client = QuoteClient::new("http://127.0.0.1:9");
        let mut form = filled_form();
        form.update_field(FormField::DogName, "");

        let error = tokio_test::block_on(client.submit(&mut form)).unwrap_err();

        assert!(matches!(error, SubmitError::Form(FormError::MissingField(FormField::DogName))));
        assert!(error.is_local());
        assert_eq!(form.field(FormField::FirstName), "Dana");
        assert!(form.is_submit_enabled());
    }

    #[test]
    fn test_submit_refused_while_in_flight() {
        let client = QuoteClient::new("http://127.0.0.1:9");
        let mut form = filled_form();
        form.set_submitting(true);

        let error = tokio_test::block_on(client.submit(&mut form)).unwrap_err();
        assert!(matches!(error, SubmitError::InFlight));
        assert_eq!(form.documents().len(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_preserves_form() {
        let http = Client::builder().no_proxy().build().unwrap();
        let client = QuoteClient::with_client(http, "http://127.0.0.1:1");
        let mut form = filled_form();

        let error = client.submit(&mut form).await.unwrap_err();

        assert!(matches!(error, SubmitError::Network(_)));
        assert_eq!(error.to_string(), GENERIC_SUBMIT_FAILURE);
        assert_eq!(form.field(FormField::DogName), "Biscuit");
        assert_eq!(form.documents().len(), 1);
        assert!(form.is_submit_enabled());
    }

    #[tokio::test]
    async fn test_cancelled_submit_reenables_form() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                open.push(stream);
            }
        });

        let http = Client::builder().no_proxy().build().unwrap();
        let client = QuoteClient::with_client(http, format!("http://{}", addr));
        let mut form = filled_form();

        let cancelled = tokio::time::timeout(Duration::from_millis(200), client.submit(&mut form)).await;
        assert!(cancelled.is_err());
        assert!(form.is_submit_enabled());
        assert_eq!(form.field(FormField::DogName), "Biscuit");

        let retry = tokio::time::timeout(Duration::from_millis(200), client.submit(&mut form)).await;
        assert!(!matches!(retry, Ok(Err(SubmitError::InFlight))));
        assert!(form.is_submit_enabled());
    }

    #[test]
    fn test_invalid_content_type_is_reported() {
        let mut form = filled_form();
        form.add_files(
            vec![FileAttachment::new("shots.pdf", "not a mime type", vec![1])],
            FileTarget::Documents,
        );
        let payload = form.build_submission_payload().unwrap();

        let error = multipart_form(payload).unwrap_err();
        assert!(matches!(error, SubmitError::Attachment { ref file_name, .. } if file_name == "shots.pdf"));
    }
}
