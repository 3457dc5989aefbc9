use serde::{Deserialize, Serialize};

use crate::FileAttachment;

/// A notification email ready for the mail transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body_html: String,
    pub body_text: String,
    pub attachments: Vec<FileAttachment>,
}

impl OutboundEmail {
    pub fn attachment_names(&self) -> Vec<&str> {
        self.attachments.iter().map(|a| a.file_name.as_str()).collect()
    }

    pub fn total_attachment_size(&self) -> u64 {
        self.attachments.iter().map(FileAttachment::size).sum()
    }
}
