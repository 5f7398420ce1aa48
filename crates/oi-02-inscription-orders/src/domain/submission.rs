//! # Order Submission
//!
//! Files and parameters sent to the inscription service, plus the checks
//! run before anything leaves the process.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::errors::SubmissionError;
use super::value_objects::FeeRate;

/// Largest file accepted for inscription (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// MIME types accepted for inscription.
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "text/plain"];

/// One file to inscribe, carried as a `data:` URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InscriptionFile {
    /// File name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size of the raw content in bytes.
    pub size: u64,
    /// `data:<mime>;base64,<content>`.
    pub data_url: String,
}

impl InscriptionFile {
    /// Build from raw content.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        let mime_type = mime_type.into();
        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes));
        Self {
            name: name.into(),
            mime_type,
            size: bytes.len() as u64,
            data_url,
        }
    }
}

/// A validated order request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    /// Files in inscription order.
    pub files: Vec<InscriptionFile>,
    /// Clamped fee rate.
    pub fee_rate: FeeRate,
    /// Address inscriptions are delivered to.
    pub receive_address: String,
    /// Use the service's low-postage (546 sat) outputs.
    pub low_postage: bool,
}

impl OrderSubmission {
    /// Validate inputs and build a submission.
    ///
    /// # Errors
    /// * `SubmissionError::NoFiles`
    /// * `SubmissionError::UnsupportedMimeType`
    /// * `SubmissionError::FileTooLarge` - larger than `max_file_size`
    /// * `SubmissionError::MissingReceiveAddress`
    pub fn new(
        files: Vec<InscriptionFile>,
        receive_address: &str,
        fee_rate: FeeRate,
        low_postage: bool,
        max_file_size: u64,
    ) -> Result<Self, SubmissionError> {
        if files.is_empty() {
            return Err(SubmissionError::NoFiles);
        }
        for file in &files {
            if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
                return Err(SubmissionError::UnsupportedMimeType {
                    name: file.name.clone(),
                    mime_type: file.mime_type.clone(),
                });
            }
            if file.size > max_file_size {
                return Err(SubmissionError::FileTooLarge {
                    name: file.name.clone(),
                    size: file.size,
                    max: max_file_size,
                });
            }
        }

        let receive_address = receive_address.trim();
        if receive_address.is_empty() {
            return Err(SubmissionError::MissingReceiveAddress);
        }

        Ok(Self {
            files,
            fee_rate,
            receive_address: receive_address.to_string(),
            low_postage,
        })
    }
}

/// MIME type for a file name, by extension.
pub fn mime_type_for(name: &str) -> Option<&'static str> {
    let extension = name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}
