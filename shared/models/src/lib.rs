//! # Grooming Spot Domain Models
//!
//! Data shared by the appointment form client and the quote service.
//!
//! ## Key Models
//!
//! - **AppointmentRequest**: contact, dog, service and scheduling details of one request
//! - **Scheduling**: either an explicit desired date or "first available"
//! - **MainService / AdditionalService**: the service catalog and its label tables
//! - **FileAttachment / UploadLimits**: uploaded files and their size ceilings
//! - **OutboundEmail**: the notification email sent to the groomer
//! - **SubmissionResponse**: the `{ success, error }` body returned to the form
//!
//! Multipart field names used on the wire live in [`wire`].

pub mod appointment;
pub mod attachment;
pub mod email;
pub mod response;
pub mod service_catalog;
pub mod wire;


pub use appointment::*;
pub use attachment::*;
pub use email::*;
pub use response::*;
pub use service_catalog::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Either a desired date or first available must be chosen")]
    MissingSchedule,

    #[error("Invalid desired date: {0}")]
    InvalidDate(String),
}
