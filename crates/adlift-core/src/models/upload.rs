use serde::{Deserialize, Serialize};

use crate::models::JobCompletion;

/// Immediate response body of `POST /upload/stream`.
///
/// The endpoint answers in one of three shapes (duplicate, async-accepted,
/// small synchronous import), so every field is optional here and the
/// transport classifies the response in a fixed order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamUploadResponse {
    /// "duplicate" or "accepted" when present.
    pub status: Option<String>,
    pub job_id: Option<String>,
    pub file_hash: Option<String>,
    pub message: Option<String>,
    /// Reference to the prior upload when the content was a duplicate.
    pub original_upload: Option<serde_json::Value>,
    /// Set for small imports handled synchronously.
    pub success: Option<bool>,
    pub imported_count: Option<i64>,
    pub summary: Option<serde_json::Value>,
}

/// Terminal outcome of one upload attempt. Exactly one variant per call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadResult {
    /// Server accepted the file. `job_id` is `None` for synchronous imports;
    /// `completion` is `None` when polling suspended with the job still
    /// running server-side.
    Accepted {
        #[serde(skip_serializing_if = "Option::is_none")]
        job_id: Option<String>,
        file_hash: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        completion: Option<JobCompletion>,
    },
    /// Identical content was uploaded before; nothing was imported.
    Duplicate {
        file_hash: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        original_upload: Option<serde_json::Value>,
    },
    Error {
        message: String,
    },
}

impl UploadResult {
    pub fn is_error(&self) -> bool {
        matches!(self, UploadResult::Error { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            UploadResult::Accepted { message, .. } => message,
            UploadResult::Duplicate { message, .. } => message,
            UploadResult::Error { message } => message,
        }
    }
}

/// Result of the local duplicate pre-check.
///
/// Duplicate detection happens server-side during the upload itself; this
/// surface only computes the fingerprint, so `is_duplicate` is always false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCheck {
    pub is_duplicate: bool,
    pub hash: String,
}
