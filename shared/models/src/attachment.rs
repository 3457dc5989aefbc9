//! File attachment models and upload limits.

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MEGABYTE: u64 = 1024 * 1024;

/// Extensions accepted for vaccination records and other documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "doc", "docx"];

/// Extensions accepted for the dog photo.
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic"];

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An uploaded file held in memory for the lifetime of one submission.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl FileAttachment {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        let content_type = content_type.into();
        Self {
            file_name: file_name.into(),
            content_type: if content_type.trim().is_empty() {
                DEFAULT_CONTENT_TYPE.to_string()
            } else {
                content_type
            },
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Lowercased extension, if the file name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
    }

    pub fn has_extension_in(&self, allowed: &[&str]) -> bool {
        self.extension()
            .map(|ext| allowed.contains(&ext.as_str()))
            .unwrap_or(false)
    }
}

// Contents are elided so request logs never dump uploaded bytes.
impl std::fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

/// Size ceilings for uploads, checked per file and across the whole request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLimits {
    pub max_file_size: u64,
    pub max_total_size: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: 5 * MEGABYTE,
            max_total_size: 8 * MEGABYTE,
        }
    }
}

/// Formats a byte count the way the form reports it, e.g. `5.01MB`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2}MB", bytes as f64 / MEGABYTE as f64)
}
