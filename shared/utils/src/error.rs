use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use grooming_models::{ModelError, SubmissionResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned to the form whenever the failure is on our side.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to send appointment request";

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum GroomingError {
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Malformed upload: {message}")]
    Multipart { message: String },

    #[error("Request too large: {message}")]
    PayloadTooLarge { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Email delivery error: {message}")]
    EmailDelivery { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl GroomingError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn multipart(message: impl Into<String>) -> Self {
        Self::Multipart {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn email_delivery(message: impl Into<String>) -> Self {
        Self::EmailDelivery {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Multipart { .. } => "MALFORMED_UPLOAD",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::EmailDelivery { .. } => "EMAIL_DELIVERY_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Multipart { .. } => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::Configuration { .. } => 500,
            Self::EmailDelivery { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }

    /// Text safe to show the submitter. Server-side failures collapse to a
    /// generic message so transport details and credentials stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Multipart { message } | Self::PayloadTooLarge { message } => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

pub type GroomingResult<T> = Result<T, GroomingError>;

impl IntoResponse for GroomingError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(SubmissionResponse::failed(self.client_message()))).into_response()
    }
}

impl From<ModelError> for GroomingError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::UnknownService(_) => Self::validation("mainService", error.to_string()),
            ModelError::MissingSchedule | ModelError::InvalidDate(_) => {
                Self::validation("desiredDate", error.to_string())
            }
        }
    }
}

impl From<MultipartError> for GroomingError {
    fn from(error: MultipartError) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge {
                message: "Upload exceeds the maximum request size".to_string(),
            }
        } else {
            Self::multipart(error.body_text())
        }
    }
}

impl From<MultipartRejection> for GroomingError {
    fn from(error: MultipartRejection) -> Self {
        Self::multipart(error.body_text())
    }
}
