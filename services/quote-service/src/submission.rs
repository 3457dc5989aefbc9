//! Multipart Submission Parsing
//!
//! Turns the appointment form's multipart body into an `AppointmentRequest`
//! plus its uploaded files.

use axum::extract::Multipart;
use grooming_models::{
    wire, AppointmentRequest, FileAttachment, MainService, Scheduling, UploadLimits, DOCUMENT_EXTENSIONS,
    PHOTO_EXTENSIONS,
};
use grooming_utils::{
    validate_file_size, validate_file_type, validate_model, validate_required_fields, validate_total_size,
    GroomingError, GroomingResult,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Fields the server refuses to mail without.
pub const REQUIRED_FIELDS: &[&str] = &[
    wire::FIRST_NAME,
    wire::LAST_NAME,
    wire::PHONE,
    wire::EMAIL,
    wire::DOG_NAME,
    wire::DOG_BREED,
    wire::DOG_WEIGHT,
    wire::DOG_AGE,
    wire::MAIN_SERVICE,
];

/// A parsed appointment submission.
#[derive(Debug, Clone)]
pub struct QuoteSubmission {
    pub request: AppointmentRequest,
    pub documents: Vec<FileAttachment>,
    pub dog_photo: Option<FileAttachment>,
}

impl QuoteSubmission {
    /// Documents in index order, then the dog photo.
    pub fn into_attachments(self) -> (AppointmentRequest, Vec<FileAttachment>) {
        let mut attachments = self.documents;
        attachments.extend(self.dog_photo);
        (self.request, attachments)
    }
}

/// Reads every part of the form and builds a validated submission.
pub async fn read_submission(mut multipart: Multipart, limits: &UploadLimits) -> GroomingResult<QuoteSubmission> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut documents: Vec<(usize, FileAttachment)> = Vec::new();
    let mut dog_photo = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().unwrap_or_default().to_string();

        let Some(file_name) = file_name else {
            let value = field.text().await?;
            fields.insert(name, value);
            continue;
        };

        let data = field.bytes().await?.to_vec();
        if let Some(index) = wire::document_index(&name) {
            if data.is_empty() && file_name.is_empty() {
                continue;
            }
            documents.push((index, FileAttachment::new(file_name, content_type, data)));
        } else if name == wire::DOG_PHOTO {
            // Browsers send an empty part when no photo was picked.
            if !data.is_empty() {
                dog_photo = Some(FileAttachment::new(file_name, content_type, data));
            }
        } else {
            debug!(part = %name, "Ignoring unexpected file part");
        }
    }

    documents.sort_by_key(|(index, _)| *index);
    let documents: Vec<FileAttachment> = documents.into_iter().map(|(_, file)| file).collect();

    for file in &documents {
        validate_file_type(&file.file_name, DOCUMENT_EXTENSIONS)?;
        validate_file_size(file, limits.max_file_size)?;
    }
    if let Some(photo) = &dog_photo {
        validate_file_type(&photo.file_name, PHOTO_EXTENSIONS)?;
        validate_file_size(photo, limits.max_file_size)?;
    }
    let all_files: Vec<FileAttachment> = documents.iter().chain(dog_photo.iter()).cloned().collect();
    validate_total_size(&all_files, limits.max_total_size)?;

    let uploaded_files = all_files.into_iter().map(|file| file.file_name).collect();
    let request = build_request(&fields, uploaded_files)?;

    Ok(QuoteSubmission {
        request,
        documents,
        dog_photo,
    })
}

/// Builds and validates the request from the scalar form fields.
pub fn build_request(fields: &HashMap<String, String>, uploaded_files: Vec<String>) -> GroomingResult<AppointmentRequest> {
    validate_required_fields(fields, REQUIRED_FIELDS)?;

    let text = |key: &str| fields.get(key).map(|v| v.trim().to_string()).unwrap_or_default();
    let optional = |key: &str| {
        fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let main_service = text(wire::MAIN_SERVICE);
    if main_service.parse::<MainService>().is_err() {
        warn!(main_service = %main_service, "Unrecognized main service");
    }

    let scheduling = Scheduling::from_wire(
        fields.get(wire::DESIRED_DATE).map(String::as_str),
        fields.get(wire::FIRST_AVAILABLE).map(String::as_str),
    )?;

    let request = AppointmentRequest {
        first_name: text(wire::FIRST_NAME),
        last_name: text(wire::LAST_NAME),
        phone: text(wire::PHONE),
        alt_phone: optional(wire::ALT_PHONE),
        email: text(wire::EMAIL),
        dog_name: text(wire::DOG_NAME),
        dog_breed: text(wire::DOG_BREED),
        dog_weight: text(wire::DOG_WEIGHT),
        dog_age: text(wire::DOG_AGE),
        main_service,
        additional_services: parse_additional_services(fields.get(wire::ADDITIONAL_SERVICES))?,
        scheduling,
        comments: optional(wire::COMMENTS),
        uploaded_files,
    };

    validate_model(&request)?;
    Ok(request)
}

/// Decodes the JSON array sent in `additionalServices`, dropping duplicates.
pub fn parse_additional_services(raw: Option<&String>) -> GroomingResult<Vec<String>> {
    let raw = match raw.map(|r| r.trim()) {
        None | Some("") => return Ok(Vec::new()),
        Some(raw) => raw,
    };

    let parsed: Vec<String> = serde_json::from_str(raw).map_err(|_| {
        GroomingError::validation(
            wire::ADDITIONAL_SERVICES,
            "additionalServices must be a JSON array of strings",
        )
    })?;

    let mut services: Vec<String> = Vec::with_capacity(parsed.len());
    for service in parsed {
        if !services.contains(&service) {
            services.push(service);
        }
    }
    Ok(services)
}
