//! Multipart field names shared by the form client and the quote endpoint.

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const PHONE: &str = "phone";
pub const ALT_PHONE: &str = "altPhone";
pub const EMAIL: &str = "email";
pub const DOG_NAME: &str = "dogName";
pub const DOG_BREED: &str = "dogBreed";
pub const DOG_WEIGHT: &str = "dogWeight";
pub const DOG_AGE: &str = "dogAge";
pub const MAIN_SERVICE: &str = "mainService";
pub const ADDITIONAL_SERVICES: &str = "additionalServices";
pub const DESIRED_DATE: &str = "desiredDate";
pub const FIRST_AVAILABLE: &str = "firstAvailable";
pub const COMMENTS: &str = "comments";

pub const DOG_PHOTO: &str = "dogPhoto";
pub const DOCUMENT_PREFIX: &str = "documents_";

/// Part name for the document at `index`, e.g. `documents_0`.
pub fn document_key(index: usize) -> String {
    format!("{}{}", DOCUMENT_PREFIX, index)
}

/// Index encoded in a `documents_<n>` part name.
pub fn document_index(key: &str) -> Option<usize> {
    let digits = key.strip_prefix(DOCUMENT_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
