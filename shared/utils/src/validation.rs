use crate::error::{GroomingError, GroomingResult};
use grooming_models::{format_megabytes, FileAttachment};
use std::collections::HashMap;
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> GroomingResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let field = first_invalid_field(&errors).unwrap_or("model").to_string();
            Err(GroomingError::validation(field, format_validation_errors(&errors)))
        }
    }
}

fn first_invalid_field(errors: &ValidationErrors) -> Option<&'static str> {
    errors.field_errors().keys().min().copied()
}

/// Flattens validator output into one message, ordered by field name.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by_key(|(field, _)| **field);

    let mut messages = Vec::new();
    for (field, field_errors) in fields {
        for error in field_errors.iter() {
            if let Some(message) = &error.message {
                messages.push(message.to_string());
                continue;
            }

            let message = match error.code.as_ref() {
                "email" => "Invalid email format".to_string(),
                "phone" => format!("Invalid phone number for field '{}'", field),
                "weight" => format!("Weight must be a positive number for field '{}'", field),
                "length" => format!("Length validation failed for field '{}'", field),
                "range" => format!("Value out of range for field '{}'", field),
                "required" => format!("Field '{}' is required", field),
                code => format!("Validation failed for field '{}': {}", field, code),
            };
            messages.push(message);
        }
    }

    messages.join(", ")
}

pub fn validate_file_type(file_name: &str, allowed_types: &[&str]) -> GroomingResult<()> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !allowed_types.contains(&extension.to_lowercase().as_str()) {
        return Err(GroomingError::validation(
            "file_type",
            format!(
                "File type '{}' not allowed for {}. Allowed types: {}",
                extension,
                file_name,
                allowed_types.join(", ")
            ),
        ));
    }

    Ok(())
}

pub fn validate_file_size(file: &FileAttachment, max_size: u64) -> GroomingResult<()> {
    if file.size() > max_size {
        return Err(GroomingError::validation(
            "file_size",
            format!(
                "File too large: {} ({}). Maximum size is {}",
                file.file_name,
                format_megabytes(file.size()),
                format_megabytes(max_size)
            ),
        ));
    }

    Ok(())
}

pub fn validate_total_size(files: &[FileAttachment], max_total: u64) -> GroomingResult<()> {
    let total: u64 = files.iter().map(FileAttachment::size).sum();
    if total > max_total {
        return Err(GroomingError::validation(
            "attachments",
            format!(
                "Total upload size {} exceeds the {} limit",
                format_megabytes(total),
                format_megabytes(max_total)
            ),
        ));
    }

    Ok(())
}

/// Checks that each required field is present and not blank.
pub fn validate_required_fields(data: &HashMap<String, String>, required_fields: &[&str]) -> GroomingResult<()> {
    let missing_fields: Vec<&str> = required_fields
        .iter()
        .filter(|field| data.get(**field).map(|v| v.trim().is_empty()).unwrap_or(true))
        .copied()
        .collect();

    if !missing_fields.is_empty() {
        return Err(GroomingError::validation(
            missing_fields[0],
            format!("Missing required fields: {}", missing_fields.join(", ")),
        ));
    }

    Ok(())
}
