use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
};
use grooming_models::SubmissionResponse;
use grooming_utils::{log_error, GroomingError, GroomingResult};
use tracing::{info, warn};

use crate::{submission::read_submission, AppState};

/// `POST /api/quote`: accepts the appointment form and emails it to the salon.
pub async fn submit_quote(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SubmissionResponse>, GroomingError> {
    match process_quote(&state, multipart).await {
        Ok(()) => Ok(Json(SubmissionResponse::ok())),
        Err(error) if error.is_client_error() => {
            warn!(error = %error, code = error.error_code(), "Rejected appointment request");
            Err(error)
        }
        Err(error) => {
            log_error!(error, "Failed to send appointment request", code = error.error_code());
            Err(error)
        }
    }
}

async fn process_quote(state: &AppState, multipart: Result<Multipart, MultipartRejection>) -> GroomingResult<()> {
    let submission = read_submission(multipart?, &state.config.uploads).await?;

    info!(
        dog_name = %submission.request.dog_name,
        main_service = %submission.request.main_service,
        files = submission.request.uploaded_files.len(),
        "Received appointment request"
    );

    state.quote_service.submit_request(submission).await
}
