//! Error types for the upload pipeline.
//!
//! Every failure mode of the pipeline is represented by a variant of
//! [`UploadError`]. The pipeline itself never lets one of these escape to the
//! caller: the top-level entry point converts them into an `error` progress
//! event plus an `UploadResult::Error`. Callers that use the lower layers
//! (transport, poller) directly branch on the variants.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// File could not be read to completion during hashing or submission.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Network failure or non-2xx response from the ingestion API.
    #[error("Transport error{}: {detail}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Transport { status: Option<u16>, detail: String },

    /// The server rejected the request with 401. A session-expired signal is
    /// broadcast separately; this variant is what the call itself returns.
    #[error("Session expired")]
    SessionExpired,

    /// The import job reached a terminal `failed` status server-side.
    #[error("Processing failed: {0}")]
    JobFailed(String),

    /// A 2xx response that matched none of the known response shapes.
    #[error("Unrecognized server response: {0}")]
    InvalidResponse(String),

    /// The caller's cancellation token fired mid-flight.
    #[error("Upload cancelled")]
    Cancelled,
}

impl UploadError {
    /// Message suitable for surfacing to an end user in a progress event.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Io(e) => format!("Could not read file: {}", e),
            UploadError::Transport { detail, .. } => detail.clone(),
            UploadError::SessionExpired => "Your session has expired. Please sign in again.".to_string(),
            UploadError::JobFailed(msg) => msg.clone(),
            UploadError::InvalidResponse(_) => "The server returned an unexpected response.".to_string(),
            UploadError::Cancelled => "Upload cancelled".to_string(),
        }
    }

    /// Convenience constructor for transport failures without an HTTP status
    /// (connection refused, DNS failure, body read errors).
    pub fn network(detail: impl Into<String>) -> Self {
        UploadError::Transport {
            status: None,
            detail: detail.into(),
        }
    }
}
