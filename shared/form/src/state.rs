//! Appointment form state
//!
//! Each `AppointmentForm` owns the values of one booking form. Mutations are
//! cheap and local; everything that spans fields is checked only when the
//! payload is built.

use chrono::NaiveDate;
use grooming_models::{
    format_megabytes, is_valid_age, is_valid_phone, is_valid_weight, wire, AdditionalService, FileAttachment, MainService,
    Scheduling, UploadLimits, DOCUMENT_EXTENSIONS, MAX_DOG_AGE, PHOTO_EXTENSIONS,
};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Free-text inputs of the form, in the order they appear on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Phone,
    AltPhone,
    Email,
    DogName,
    DogBreed,
    DogWeight,
    DogAge,
    Comments,
}

impl FormField {
    pub const ALL: [FormField; 10] = [
        Self::FirstName,
        Self::LastName,
        Self::Phone,
        Self::AltPhone,
        Self::Email,
        Self::DogName,
        Self::DogBreed,
        Self::DogWeight,
        Self::DogAge,
        Self::Comments,
    ];

    /// Fields that must be filled in, in form order.
    pub const REQUIRED: [FormField; 8] = [
        Self::FirstName,
        Self::LastName,
        Self::Phone,
        Self::Email,
        Self::DogName,
        Self::DogBreed,
        Self::DogWeight,
        Self::DogAge,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::FirstName => wire::FIRST_NAME,
            Self::LastName => wire::LAST_NAME,
            Self::Phone => wire::PHONE,
            Self::AltPhone => wire::ALT_PHONE,
            Self::Email => wire::EMAIL,
            Self::DogName => wire::DOG_NAME,
            Self::DogBreed => wire::DOG_BREED,
            Self::DogWeight => wire::DOG_WEIGHT,
            Self::DogAge => wire::DOG_AGE,
            Self::Comments => wire::COMMENTS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Phone => "Phone number",
            Self::AltPhone => "Alternate phone number",
            Self::Email => "Email",
            Self::DogName => "Dog's name",
            Self::DogBreed => "Dog's breed",
            Self::DogWeight => "Dog's weight",
            Self::DogAge => "Dog's age",
            Self::Comments => "Comments",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|field| field == self).unwrap_or_default()
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Which upload slot a file goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTarget {
    Documents,
    DogPhoto,
}

impl FileTarget {
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Documents => DOCUMENT_EXTENSIONS,
            Self::DogPhoto => PHOTO_EXTENSIONS,
        }
    }
}

/// Problems that keep the form from being submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("{} is required", .0.label())]
    MissingField(FormField),

    #[error("Please enter a valid phone number")]
    InvalidPhone,

    #[error("Please enter a valid alternate phone number")]
    InvalidAltPhone,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Dog's weight must be a positive number")]
    InvalidWeight,

    #[error("Dog's age must be a whole number between 0 and {}", MAX_DOG_AGE)]
    InvalidAge,

    #[error("Please select a main service")]
    MissingMainService,

    #[error("Please choose a desired date or first available")]
    MissingSchedule,

    #[error("Please upload at least one document")]
    MissingDocuments,

    #[error("file too large: {file_name} ({size})")]
    FileTooLarge { file_name: String, size: String },

    #[error("unsupported file type: {file_name}")]
    UnsupportedFileType { file_name: String },

    #[error("Total upload size {total} exceeds the {limit} limit")]
    TotalSizeExceeded { total: String, limit: String },
}

/// Validated snapshot of a form, ready to be sent as multipart.
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    pub fields: Vec<(&'static str, String)>,
    pub documents: Vec<FileAttachment>,
    pub dog_photo: Option<FileAttachment>,
}

impl SubmissionPayload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn total_size(&self) -> u64 {
        self.documents
            .iter()
            .chain(self.dog_photo.iter())
            .map(FileAttachment::size)
            .sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentForm {
    values: [String; 10],
    main_service: Option<MainService>,
    additional_services: Vec<AdditionalService>,
    scheduling: Option<Scheduling>,
    documents: Vec<FileAttachment>,
    dog_photo: Option<FileAttachment>,
    limits: UploadLimits,
    submitting: bool,
}

impl AppointmentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: UploadLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        &self.values[field.index()]
    }

    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    pub fn main_service(&self) -> Option<MainService> {
        self.main_service
    }

    pub fn select_main_service(&mut self, service: MainService) {
        self.main_service = Some(service);
    }

    pub fn additional_services(&self) -> &[AdditionalService] {
        &self.additional_services
    }

    /// Adds or removes one add-on. Selection order is kept for display.
    pub fn toggle_additional_service(&mut self, service: AdditionalService, included: bool) {
        let selected = self.additional_services.contains(&service);
        if included && !selected {
            self.additional_services.push(service);
        } else if !included && selected {
            self.additional_services.retain(|s| *s != service);
        }
    }

    pub fn scheduling(&self) -> Option<Scheduling> {
        self.scheduling
    }

    pub fn is_first_available(&self) -> bool {
        self.scheduling.map(|s| s.is_first_available()).unwrap_or(false)
    }

    pub fn desired_date(&self) -> Option<NaiveDate> {
        self.scheduling.and_then(|s| s.desired_date())
    }

    /// Checking the box drops any explicit date; unchecking leaves nothing chosen.
    pub fn set_first_available(&mut self, flag: bool) {
        if flag {
            self.scheduling = Some(Scheduling::FirstAvailable);
        } else if self.is_first_available() {
            self.scheduling = None;
        }
    }

    /// Picking a date replaces first-available.
    pub fn set_desired_date(&mut self, date: Option<NaiveDate>) {
        match date {
            Some(date) => self.scheduling = Some(Scheduling::ExplicitDate(date)),
            None if self.desired_date().is_some() => self.scheduling = None,
            None => {}
        }
    }

    pub fn documents(&self) -> &[FileAttachment] {
        &self.documents
    }

    pub fn dog_photo(&self) -> Option<&FileAttachment> {
        self.dog_photo.as_ref()
    }

    /// Adds picked files to a slot. Files that are too large or of the wrong
    /// type are skipped and returned as errors; the rest are kept.
    pub fn add_files(&mut self, files: Vec<FileAttachment>, target: FileTarget) -> Vec<FormError> {
        let mut rejected = Vec::new();

        for file in files {
            if file.size() > self.limits.max_file_size {
                rejected.push(FormError::FileTooLarge {
                    size: format_megabytes(file.size()),
                    file_name: file.file_name,
                });
                continue;
            }
            if !file.has_extension_in(target.allowed_extensions()) {
                rejected.push(FormError::UnsupportedFileType {
                    file_name: file.file_name,
                });
                continue;
            }

            match target {
                FileTarget::Documents => self.documents.push(file),
                FileTarget::DogPhoto => self.dog_photo = Some(file),
            }
        }

        if !rejected.is_empty() {
            debug!(rejected = rejected.len(), "Some picked files were not added");
        }
        rejected
    }

    /// Removes one document by position, or clears the photo. Out-of-range
    /// indices do nothing.
    pub fn remove_file(&mut self, target: FileTarget, index: usize) {
        match target {
            FileTarget::Documents if index < self.documents.len() => {
                self.documents.remove(index);
            }
            FileTarget::Documents => {}
            FileTarget::DogPhoto => self.dog_photo = None,
        }
    }

    pub fn total_file_size(&self) -> u64 {
        self.documents
            .iter()
            .chain(self.dog_photo.iter())
            .map(FileAttachment::size)
            .sum()
    }

    /// Checks the whole form and snapshots it for sending. Reports only the
    /// first problem found.
    pub fn build_submission_payload(&self) -> Result<SubmissionPayload, FormError> {
        for field in FormField::REQUIRED {
            if self.field(field).trim().is_empty() {
                return Err(FormError::MissingField(field));
            }
        }
        if !is_valid_phone(self.field(FormField::Phone)) {
            return Err(FormError::InvalidPhone);
        }
        let alt_phone = self.field(FormField::AltPhone);
        if !alt_phone.trim().is_empty() && !is_valid_phone(alt_phone) {
            return Err(FormError::InvalidAltPhone);
        }
        if !validator::validate_email(self.field(FormField::Email).trim()) {
            return Err(FormError::InvalidEmail);
        }
        if !is_valid_weight(self.field(FormField::DogWeight)) {
            return Err(FormError::InvalidWeight);
        }
        if !is_valid_age(self.field(FormField::DogAge)) {
            return Err(FormError::InvalidAge);
        }
        let main_service = self.main_service.ok_or(FormError::MissingMainService)?;
        let scheduling = self.scheduling.ok_or(FormError::MissingSchedule)?;
        if self.documents.is_empty() {
            return Err(FormError::MissingDocuments);
        }
        let total = self.total_file_size();
        if total > self.limits.max_total_size {
            return Err(FormError::TotalSizeExceeded {
                total: format_megabytes(total),
                limit: format_megabytes(self.limits.max_total_size),
            });
        }

        let additional: Vec<&str> = self.additional_services.iter().map(|s| s.as_str()).collect();
        let additional = serde_json::to_string(&additional).unwrap_or_else(|_| "[]".to_string());
        let (desired_date, first_available) = scheduling.to_wire();

        let mut fields: Vec<(&'static str, String)> = FormField::ALL
            .into_iter()
            .filter(|field| *field != FormField::Comments)
            .map(|field| (field.wire_name(), self.field(field).trim().to_string()))
            .collect();
        fields.push((wire::MAIN_SERVICE, main_service.as_str().to_string()));
        fields.push((wire::ADDITIONAL_SERVICES, additional));
        fields.push((wire::DESIRED_DATE, desired_date));
        fields.push((wire::FIRST_AVAILABLE, first_available.to_string()));
        fields.push((wire::COMMENTS, self.field(FormField::Comments).trim().to_string()));

        Ok(SubmissionPayload {
            fields,
            documents: self.documents.clone(),
            dog_photo: self.dog_photo.clone(),
        })
    }

    /// Clears every field and file. Upload limits are kept.
    pub fn reset(&mut self) {
        *self = Self::with_limits(self.limits);
    }

    /// False while a submission is in flight.
    pub fn is_submit_enabled(&self) -> bool {
        !self.submitting
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grooming_models::MEGABYTE;
    use proptest::prelude::*;

    fn file(name: &str, size: u64) -> FileAttachment {
        FileAttachment::new(name, "application/pdf", vec![0; size as usize])
    }

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
        form.add_files(vec![file("rabies.pdf", 1024)], FileTarget::Documents);
        form
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in FormField::ALL {
            assert_eq!(field.wire_name().parse::<FormField>().unwrap(), field);
        }
        assert!("ownerName".parse::<FormField>().is_err());
    }

    #[test]
    fn test_update_field_only_touches_that_field() {
        let mut form = AppointmentForm::new();
        form.update_field(FormField::DogName, "Biscuit");

        assert_eq!(form.field(FormField::DogName), "Biscuit");
        assert_eq!(form.field(FormField::DogBreed), "");
        assert!(form.scheduling().is_none());
    }

    #[test]
    fn test_toggle_additional_service_has_no_duplicates() {
        let mut form = AppointmentForm::new();
        form.toggle_additional_service(AdditionalService::TeethBrushing, true);
        form.toggle_additional_service(AdditionalService::NailFiling, true);
        form.toggle_additional_service(AdditionalService::TeethBrushing, true);
        assert_eq!(
            form.additional_services(),
            &[AdditionalService::TeethBrushing, AdditionalService::NailFiling]
        );

        form.toggle_additional_service(AdditionalService::TeethBrushing, false);
        form.toggle_additional_service(AdditionalService::DeShedding, false);
        assert_eq!(form.additional_services(), &[AdditionalService::NailFiling]);
    }

    #[test]
    fn test_first_available_clears_date() {
        let mut form = AppointmentForm::new();
        form.set_desired_date(NaiveDate::from_ymd_opt(2025, 3, 15));
        form.set_first_available(true);

        assert!(form.is_first_available());
        assert_eq!(form.desired_date(), None);

        form.set_first_available(false);
        assert_eq!(form.scheduling(), None);
    }

    #[test]
    fn test_date_clears_first_available() {
        let mut form = AppointmentForm::new();
        form.set_first_available(true);
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        form.set_desired_date(Some(date));

        assert!(!form.is_first_available());
        assert_eq!(form.scheduling(), Some(Scheduling::ExplicitDate(date)));

        form.set_desired_date(None);
        assert_eq!(form.scheduling(), None);
    }

    #[test]
    fn test_file_size_boundary() {
        let mut form = AppointmentForm::new();
        let rejected = form.add_files(
            vec![file("exact.pdf", 5 * MEGABYTE), file("vaccines.pdf", 5 * MEGABYTE + 1)],
            FileTarget::Documents,
        );

        assert_eq!(form.documents().len(), 1);
        assert_eq!(form.documents()[0].file_name, "exact.pdf");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].to_string(), "file too large: vaccines.pdf (5.00MB)");
    }

    #[test]
    fn test_oversize_message_rounds_to_hundredths() {
        let mut form = AppointmentForm::new();
        let size = (5.01 * MEGABYTE as f64) as u64;
        let rejected = form.add_files(vec![file("vaccines.pdf", size)], FileTarget::Documents);

        assert_eq!(rejected[0].to_string(), "file too large: vaccines.pdf (5.01MB)");
    }

    #[test]
    fn test_disallowed_extension_is_rejected() {
        let mut form = AppointmentForm::new();
        let rejected = form.add_files(
            vec![file("notes.txt", 10), file("records.PDF", 10)],
            FileTarget::Documents,
        );

        assert_eq!(
            rejected,
            vec![FormError::UnsupportedFileType {
                file_name: "notes.txt".to_string()
            }]
        );
        assert_eq!(form.documents()[0].file_name, "records.PDF");

        let rejected = form.add_files(vec![file("biscuit.pdf", 10)], FileTarget::DogPhoto);
        assert_eq!(rejected.len(), 1);
        assert!(form.dog_photo().is_none());
    }

    #[test]
    fn test_documents_append_and_photo_replaces() {
        let mut form = AppointmentForm::new();
        form.add_files(vec![file("a.pdf", 1)], FileTarget::Documents);
        form.add_files(vec![file("b.pdf", 1)], FileTarget::Documents);
        form.add_files(vec![file("one.jpg", 1)], FileTarget::DogPhoto);
        form.add_files(vec![file("two.jpg", 1)], FileTarget::DogPhoto);

        let names: Vec<&str> = form.documents().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
        assert_eq!(form.dog_photo().unwrap().file_name, "two.jpg");
    }

    #[test]
    fn test_remove_file() {
        let mut form = AppointmentForm::new();
        form.add_files(vec![file("a.pdf", 1), file("b.pdf", 1)], FileTarget::Documents);
        form.add_files(vec![file("one.jpg", 1)], FileTarget::DogPhoto);

        form.remove_file(FileTarget::Documents, 7);
        assert_eq!(form.documents().len(), 2);

        form.remove_file(FileTarget::Documents, 0);
        assert_eq!(form.documents()[0].file_name, "b.pdf");

        form.remove_file(FileTarget::DogPhoto, 0);
        assert!(form.dog_photo().is_none());
    }

    #[test]
    fn test_payload_fields() {
        let mut form = filled_form();
        form.toggle_additional_service(AdditionalService::TeethBrushing, true);
        form.toggle_additional_service(AdditionalService::PawNoseBalm, true);
        form.update_field(FormField::Comments, "  Nervous around dryers ");

        let payload = form.build_submission_payload().unwrap();
        assert_eq!(payload.field("mainService"), Some("full-groom"));
        assert_eq!(
            payload.field("additionalServices"),
            Some(r#"["teeth-brushing","paw-nose-balm"]"#)
        );
        assert_eq!(payload.field("firstAvailable"), Some("true"));
        assert_eq!(payload.field("desiredDate"), Some(""));
        assert_eq!(payload.field("altPhone"), Some(""));
        assert_eq!(payload.field("comments"), Some("Nervous around dryers"));
        assert_eq!(payload.documents.len(), 1);
    }

    #[test]
    fn test_payload_with_explicit_date() {
        let mut form = filled_form();
        form.set_desired_date(NaiveDate::from_ymd_opt(2025, 3, 15));

        let payload = form.build_submission_payload().unwrap();
        assert_eq!(payload.field("desiredDate"), Some("2025-03-15"));
        assert_eq!(payload.field("firstAvailable"), Some("false"));
    }

    #[test]
    fn test_validation_order() {
        let mut form = AppointmentForm::new();
        assert_eq!(
            form.build_submission_payload().unwrap_err(),
            FormError::MissingField(FormField::FirstName)
        );

        form = filled_form();
        form.update_field(FormField::Phone, " ");
        form.update_field(FormField::Email, "not-an-email");
        assert_eq!(
            form.build_submission_payload().unwrap_err(),
            FormError::MissingField(FormField::Phone)
        );

        form.update_field(FormField::Phone, "call me");
        assert_eq!(form.build_submission_payload().unwrap_err(), FormError::InvalidPhone);

        form.update_field(FormField::Phone, "832-555-0142");
        form.update_field(FormField::AltPhone, "evenings");
        assert_eq!(form.build_submission_payload().unwrap_err(), FormError::InvalidAltPhone);

        form.update_field(FormField::AltPhone, "");
        assert_eq!(form.build_submission_payload().unwrap_err(), FormError::InvalidEmail);

        form.update_field(FormField::Email, "dana@example.com");
        form.update_field(FormField::DogWeight, "heavy");
        assert_eq!(form.build_submission_payload().unwrap_err(), FormError::InvalidWeight);

        form.update_field(FormField::DogWeight, "45");
        form.update_field(FormField::DogAge, "31");
        assert_eq!(form.build_submission_payload().unwrap_err(), FormError::InvalidAge);
    }

    #[test]
    fn test_phone_numbers_match_server_format() {
        let mut form = filled_form();
        form.update_field(FormField::Phone, "call me");
        assert_eq!(form.build_submission_payload().unwrap_err(), FormError::InvalidPhone);

        form.update_field(FormField::Phone, "+1 (832) 555.0142");
        form.update_field(FormField::AltPhone, "  ");
        assert!(form.build_submission_payload().is_ok());

        form.update_field(FormField::AltPhone, "555");
        assert_eq!(form.build_submission_payload().unwrap_err(), FormError::InvalidAltPhone);

        form.update_field(FormField::AltPhone, "713-555-0199");
        let payload = form.build_submission_payload().unwrap();
        assert_eq!(payload.field("altPhone"), Some("713-555-0199"));
    }

    #[test]
    fn test_missing_selections() {
        let mut form = filled_form();
        form.main_service = None;
        assert_eq!(form.build_submission_payload().unwrap_err(), FormError::MissingMainService);

        let mut form = filled_form();
        form.set_first_available(false);
        assert_eq!(form.build_submission_payload().unwrap_err(), FormError::MissingSchedule);

        let mut form = filled_form();
        form.remove_file(FileTarget::Documents, 0);
        assert_eq!(form.build_submission_payload().unwrap_err(), FormError::MissingDocuments);
    }

    #[test]
    fn test_total_size_boundary() {
        let mut form = filled_form();
        form.remove_file(FileTarget::Documents, 0);
        form.add_files(
            vec![file("a.pdf", 4 * MEGABYTE), file("b.pdf", 4 * MEGABYTE)],
            FileTarget::Documents,
        );
        assert!(form.build_submission_payload().is_ok());

        form.add_files(vec![file("c.pdf", 1)], FileTarget::Documents);
        assert_eq!(
            form.build_submission_payload().unwrap_err(),
            FormError::TotalSizeExceeded {
                total: "8.00MB".to_string(),
                limit: "8.00MB".to_string(),
            }
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = filled_form();
        form.add_files(vec![file("one.jpg", 1)], FileTarget::DogPhoto);
        form.reset();

        for field in FormField::ALL {
            assert_eq!(form.field(field), "");
        }
        assert!(form.main_service().is_none());
        assert!(form.scheduling().is_none());
        assert!(form.documents().is_empty());
        assert!(form.dog_photo().is_none());
        assert!(form.is_submit_enabled());
    }

    proptest! {
        #[test]
        fn prop_scheduling_is_never_both(steps in prop::collection::vec((any::<bool>(), 0u32..400), 0..20)) {
            let mut form = AppointmentForm::new();
            let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

            for (use_flag, offset) in steps {
                if use_flag {
                    form.set_first_available(offset % 2 == 0);
                } else {
                    form.set_desired_date(base.checked_add_days(chrono::Days::new(offset as u64)));
                }
                prop_assert!(!(form.is_first_available() && form.desired_date().is_some()));
            }
        }

        #[test]
        fn prop_accepted_files_fit_the_ceiling(sizes in prop::collection::vec(0u64..64, 0..12), ceiling in 0u64..64) {
            let mut form = AppointmentForm::with_limits(UploadLimits {
                max_file_size: ceiling,
                max_total_size: u64::MAX,
            });
            let files: Vec<FileAttachment> = sizes
                .iter()
                .enumerate()
                .map(|(i, size)| file(&format!("doc{}.pdf", i), *size))
                .collect();

            let rejected = form.add_files(files, FileTarget::Documents);

            prop_assert!(form.documents().iter().all(|f| f.size() <= ceiling));
            prop_assert_eq!(form.documents().len() + rejected.len(), sizes.len());
        }
    }
}
