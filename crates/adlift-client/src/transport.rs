//! Multipart submission to the ingestion endpoint.
//!
//! One request, no retries: retry policy belongs to the caller. The file is
//! streamed into the request body rather than buffered, and the immediate
//! response is classified into duplicate / async-accepted / sync-success.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use adlift_core::constants::UPLOAD_STREAM_PATH;
use adlift_core::{StreamUploadResponse, UploadError};

use crate::UploadClient;

/// Classified immediate response of the ingestion endpoint.
#[derive(Debug, Clone)]
pub enum TransportOutcome {
    /// Identical content already exists server-side; nothing was imported.
    Duplicate {
        file_hash: String,
        message: String,
        original_upload: Option<serde_json::Value>,
    },
    /// File accepted for asynchronous processing; track via the job id.
    Accepted { job_id: String, message: String },
    /// Small file imported synchronously; no job to poll.
    SyncSuccess {
        imported_count: Option<i64>,
        summary: Option<serde_json::Value>,
        message: String,
    },
}

/// Submit the file and classify the server's immediate answer.
///
/// A 401 broadcasts one session-expired signal on the client's channel and
/// returns [`UploadError::SessionExpired`]; other non-2xx responses become
/// [`UploadError::Transport`] with the best-effort detail from the body.
pub async fn submit(
    client: &UploadClient,
    path: &Path,
    fingerprint: &str,
    sheet_name: Option<&str>,
) -> Result<TransportOutcome, UploadError> {
    let file = File::open(path).await?;
    let len = file.metadata().await?.len();
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.bin")
        .to_string();

    let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), len)
        .file_name(filename.clone());

    let mut form = Form::new()
        .part("file", part)
        .text("file_hash", fingerprint.to_string());
    if let Some(sheet) = sheet_name {
        form = form.text("sheet_name", sheet.to_string());
    }

    let url = client.build_url(UPLOAD_STREAM_PATH);
    let request = client.client().post(&url).multipart(form);
    let request = client.apply_auth(request);
    let request = client.apply_anti_forgery(request);

    tracing::debug!(%url, file = %filename, bytes = len, "Submitting upload");

    let response = request
        .send()
        .await
        .map_err(|e| UploadError::network(format!("Failed to reach ingestion API: {}", e)))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        tracing::warn!(%url, "Upload rejected with 401, broadcasting session expiry");
        client.notify_session_expired();
        return Err(UploadError::SessionExpired);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UploadError::Transport {
            status: Some(status.as_u16()),
            detail: extract_error_detail(&body),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| UploadError::network(format!("Failed to read response body: {}", e)))?;
    let parsed: StreamUploadResponse = serde_json::from_str(&body)
        .map_err(|_| UploadError::InvalidResponse(snippet(&body)))?;

    classify_response(parsed, fingerprint, &body)
}

/// Classification rules, in order: duplicate, then async-accepted, then
/// synchronous success; anything else is an invalid response.
fn classify_response(
    resp: StreamUploadResponse,
    fingerprint: &str,
    raw_body: &str,
) -> Result<TransportOutcome, UploadError> {
    if resp.status.as_deref() == Some("duplicate") {
        return Ok(TransportOutcome::Duplicate {
            file_hash: resp.file_hash.unwrap_or_else(|| fingerprint.to_string()),
            message: resp
                .message
                .unwrap_or_else(|| "This file was already uploaded".to_string()),
            original_upload: resp.original_upload,
        });
    }

    if let Some(job_id) = resp.job_id {
        return Ok(TransportOutcome::Accepted {
            job_id,
            message: resp
                .message
                .unwrap_or_else(|| "Upload accepted for processing".to_string()),
        });
    }

    if resp.success == Some(true) {
        return Ok(TransportOutcome::SyncSuccess {
            imported_count: resp.imported_count,
            summary: resp.summary,
            message: resp
                .message
                .unwrap_or_else(|| "Import finished".to_string()),
        });
    }

    Err(UploadError::InvalidResponse(snippet(raw_body)))
}

/// Best-effort extraction of a server-provided detail message from an error
/// body: JSON `error` / `message` / `detail` fields, then raw text, then a
/// generic fallback.
pub(crate) fn extract_error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message", "detail"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Upload failed".to_string()
    } else {
        snippet(trimmed)
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    }
}
