//! Appointment request models.
//!
//! `AppointmentRequest` is the record that travels from the form to the
//! groomer's inbox. It is never persisted.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use validator::{Validate, ValidationError};

use crate::ModelError;

/// Oldest dog age (in years) the form accepts.
pub const MAX_DOG_AGE: u32 = 30;

/// When the customer wants the appointment.
///
/// Exactly one of an explicit date or "first available" is ever active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "camelCase")]
pub enum Scheduling {
    ExplicitDate(NaiveDate),
    FirstAvailable,
}

impl Scheduling {
    pub fn is_first_available(&self) -> bool {
        matches!(self, Self::FirstAvailable)
    }

    pub fn desired_date(&self) -> Option<NaiveDate> {
        match self {
            Self::ExplicitDate(date) => Some(*date),
            Self::FirstAvailable => None,
        }
    }

    /// Rebuilds scheduling from the `desiredDate` and `firstAvailable` form fields.
    ///
    /// A `"true"` first-available flag wins over any date that was also sent.
    pub fn from_wire(desired_date: Option<&str>, first_available: Option<&str>) -> Result<Self, ModelError> {
        if first_available.map(str::trim) == Some("true") {
            return Ok(Self::FirstAvailable);
        }

        match desired_date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_desired_date(raw).map(Self::ExplicitDate),
            None => Err(ModelError::MissingSchedule),
        }
    }

    /// Returns the `(desiredDate, firstAvailable)` field values.
    pub fn to_wire(&self) -> (String, &'static str) {
        match self {
            Self::ExplicitDate(date) => (date.format("%Y-%m-%d").to_string(), "false"),
            Self::FirstAvailable => (String::new(), "true"),
        }
    }
}

/// Accepts the browser date-input format and the older `MM/DD/YYYY` text format.
pub fn parse_desired_date(raw: &str) -> Result<NaiveDate, ModelError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .map_err(|_| ModelError::InvalidDate(raw.to_string()))
}

/// A single grooming appointment request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[validate(custom = "validate_phone")]
    pub alt_phone: Option<String>,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Dog's name is required"))]
    pub dog_name: String,
    #[validate(length(min = 1, message = "Dog's breed is required"))]
    pub dog_breed: String,
    #[validate(custom = "validate_weight")]
    pub dog_weight: String,
    #[validate(custom = "validate_age")]
    pub dog_age: String,
    #[validate(length(min = 1, message = "Main service is required"))]
    pub main_service: String,
    #[serde(default)]
    pub additional_services: Vec<String>,
    pub scheduling: Scheduling,
    pub comments: Option<String>,
    /// Names of every file attached to the request, documents first.
    #[serde(default)]
    pub uploaded_files: Vec<String>,
}

impl AppointmentRequest {
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_first_available(&self) -> bool {
        self.scheduling.is_first_available()
    }

    /// Comments with surrounding whitespace removed, or `None` when blank.
    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    pub fn alt_phone(&self) -> Option<&str> {
        self.alt_phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[\d\s\-\(\)\.]{7,20}$").expect("phone pattern is valid"))
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone.trim())
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

/// Weight in pounds; any positive number.
pub fn is_valid_weight(weight: &str) -> bool {
    matches!(weight.trim().parse::<f64>(), Ok(w) if w.is_finite() && w > 0.0)
}

fn validate_weight(weight: &str) -> Result<(), ValidationError> {
    if is_valid_weight(weight) {
        Ok(())
    } else {
        Err(ValidationError::new("weight"))
    }
}

/// Age in whole years, `0..=MAX_DOG_AGE`.
pub fn is_valid_age(age: &str) -> bool {
    matches!(age.trim().parse::<u32>(), Ok(a) if a <= MAX_DOG_AGE)
}

fn validate_age(age: &str) -> Result<(), ValidationError> {
    if is_valid_age(age) {
        Ok(())
    } else {
        Err(ValidationError::new("range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> AppointmentRequest {
        AppointmentRequest {
            first_name: "Dana".to_string(),
            last_name: "Whitfield".to_string(),
            phone: "(832) 555-0142".to_string(),
            alt_phone: None,
            email: "dana@example.com".to_string(),
            dog_name: "Biscuit".to_string(),
            dog_breed: "Goldendoodle".to_string(),
            dog_weight: "45".to_string(),
            dog_age: "3".to_string(),
            main_service: "full-groom".to_string(),
            additional_services: vec![],
            scheduling: Scheduling::FirstAvailable,
            comments: None,
            uploaded_files: vec!["rabies.pdf".to_string()],
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_fail() {
        let mut request = sample_request();
        request.dog_breed = String::new();
        request.email = "not-an-email".to_string();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("dog_breed"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_age_range() {
        assert!(is_valid_age("0"));
        assert!(is_valid_age("30"));
        assert!(!is_valid_age("31"));
        assert!(!is_valid_age("-1"));
        assert!(!is_valid_age("three"));
    }

    #[test]
    fn test_weight() {
        assert!(is_valid_weight("12.5"));
        assert!(!is_valid_weight("0"));
        assert!(!is_valid_weight("heavy"));
    }

    #[test]
    fn test_alt_phone_is_optional() {
        let mut request = sample_request();
        request.alt_phone = Some("abc".to_string());
        assert!(request.validate().is_err());

        request.alt_phone = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_scheduling_from_wire() {
        assert_eq!(
            Scheduling::from_wire(Some("2025-03-15"), Some("true")).unwrap(),
            Scheduling::FirstAvailable
        );
        assert_eq!(
            Scheduling::from_wire(Some("2025-03-15"), Some("false")).unwrap(),
            Scheduling::ExplicitDate(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap())
        );
        assert_eq!(
            Scheduling::from_wire(Some("03/15/2025"), None).unwrap(),
            Scheduling::ExplicitDate(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap())
        );
        assert!(matches!(
            Scheduling::from_wire(Some(""), Some("false")),
            Err(ModelError::MissingSchedule)
        ));
        assert!(matches!(
            Scheduling::from_wire(Some("next week"), None),
            Err(ModelError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_scheduling_to_wire() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        assert_eq!(
            Scheduling::ExplicitDate(date).to_wire(),
            ("2025-11-02".to_string(), "false")
        );
        assert_eq!(Scheduling::FirstAvailable.to_wire(), (String::new(), "true"));
    }

    #[test]
    fn test_blank_comments_are_none() {
        let mut request = sample_request();
        request.comments = Some("   \n".to_string());
        assert_eq!(request.comments(), None);

        request.comments = Some(" Nervous around clippers ".to_string());
        assert_eq!(request.comments(), Some("Nervous around clippers"));
    }
}
