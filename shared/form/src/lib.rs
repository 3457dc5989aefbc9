//! # Grooming Spot Appointment Form
//!
//! Client side of the appointment request pipeline.
//!
//! - [`state`]: per-form field, service, scheduling and file state plus the
//!   pre-submit validation that turns it into a [`SubmissionPayload`]
//! - [`transport`]: [`QuoteClient`], which posts the payload to `/api/quote`
//!   and resets or preserves the form depending on the answer

pub mod state;
pub mod transport;

pub use state::*;
pub use transport::*;
