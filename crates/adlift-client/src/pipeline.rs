//! End-to-end upload orchestration: hash, submit, poll.
//!
//! [`upload_with_progress`] is the exported entry point of the pipeline.
//! Progress callbacks are invoked synchronously within the calling task in
//! strict phase order, and every internal failure is converted into a final
//! `error` progress event plus an `UploadResult::Error` — nothing escapes to
//! the caller as a raw `Err` or a panic.

use std::path::Path;

use tokio_util::sync::CancellationToken;

use adlift_core::{
    DuplicateCheck, JobCompletion, UploadError, UploadPhase, UploadProgress, UploadResult,
};

use crate::hasher::compute_fingerprint;
use crate::poller::{poll_job, PollOutcome, PollPolicy};
use crate::transport::{submit, TransportOutcome};
use crate::UploadClient;

/// Per-invocation options. Each invocation owns its own token and policy;
/// no state is shared across concurrent uploads.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Sub-sheet to import when the file is a spreadsheet container.
    pub sheet_name: Option<String>,
    pub poll: PollPolicy,
    pub cancel: CancellationToken,
}

/// Upload `path` and report progress through `on_progress`.
///
/// Phases walk `hashing → uploading → processing → complete`, terminating
/// early at `error`. Duplicates short-circuit before any poll; synchronous
/// imports complete without polling; a timed-out poll yields an `Accepted`
/// result with no completion payload and a non-error "still processing"
/// progress state.
pub async fn upload_with_progress<F>(
    client: &UploadClient,
    path: &Path,
    options: &UploadOptions,
    mut on_progress: F,
) -> UploadResult
where
    F: FnMut(UploadProgress),
{
    match run_pipeline(client, path, options, &mut on_progress).await {
        Ok(result) => result,
        Err(err) => {
            let message = err.user_message();
            tracing::warn!(error = %err, "Upload pipeline failed");
            on_progress(
                UploadProgress::new(UploadPhase::Error, 0, message.clone())
                    .with_error(message.clone()),
            );
            UploadResult::Error { message }
        }
    }
}

async fn run_pipeline<F>(
    client: &UploadClient,
    path: &Path,
    options: &UploadOptions,
    on_progress: &mut F,
) -> Result<UploadResult, UploadError>
where
    F: FnMut(UploadProgress),
{
    if options.cancel.is_cancelled() {
        return Err(UploadError::Cancelled);
    }

    on_progress(UploadProgress::new(
        UploadPhase::Hashing,
        0,
        "Computing content fingerprint",
    ));
    let fingerprint = compute_fingerprint(path).await?;
    on_progress(UploadProgress::new(
        UploadPhase::Hashing,
        100,
        "Fingerprint computed",
    ));

    if options.cancel.is_cancelled() {
        return Err(UploadError::Cancelled);
    }

    on_progress(UploadProgress::new(
        UploadPhase::Uploading,
        0,
        "Uploading file",
    ));
    let outcome = submit(client, path, &fingerprint, options.sheet_name.as_deref()).await?;

    match outcome {
        TransportOutcome::Duplicate {
            file_hash,
            message,
            original_upload,
        } => {
            // Server-side dedup hit: done, no job to poll.
            on_progress(UploadProgress::new(
                UploadPhase::Complete,
                100,
                message.clone(),
            ));
            Ok(UploadResult::Duplicate {
                file_hash,
                message,
                original_upload,
            })
        }
        TransportOutcome::SyncSuccess {
            imported_count,
            summary,
            message,
        } => {
            on_progress(UploadProgress::new(
                UploadPhase::Complete,
                100,
                message.clone(),
            ));
            Ok(UploadResult::Accepted {
                job_id: None,
                file_hash: fingerprint,
                message,
                completion: Some(JobCompletion {
                    row_count: imported_count,
                    file_hash: None,
                    summary,
                    schema: None,
                    preview: None,
                }),
            })
        }
        TransportOutcome::Accepted { job_id, message } => {
            on_progress(
                UploadProgress::new(UploadPhase::Uploading, 100, message)
                    .with_job_id(job_id.clone()),
            );
            track_job(client, &fingerprint, job_id, options, on_progress).await
        }
    }
}

/// Processing phase: poll the job to a terminal state or the attempt bound.
async fn track_job<F>(
    client: &UploadClient,
    fingerprint: &str,
    job_id: String,
    options: &UploadOptions,
    on_progress: &mut F,
) -> Result<UploadResult, UploadError>
where
    F: FnMut(UploadProgress),
{
    on_progress(
        UploadProgress::new(UploadPhase::Processing, 0, "Processing upload")
            .with_job_id(job_id.clone()),
    );

    let mut last_percent = 0u8;
    let outcome = poll_job(client, &job_id, &options.poll, &options.cancel, |event| {
        last_percent = last_percent.max(event.progress);
        on_progress(event);
    })
    .await?;

    match outcome {
        PollOutcome::Completed(completion) => {
            let message = "Import complete".to_string();
            on_progress(
                UploadProgress::new(UploadPhase::Complete, 100, message.clone())
                    .with_job_id(job_id.clone()),
            );
            Ok(UploadResult::Accepted {
                job_id: Some(job_id),
                file_hash: fingerprint.to_string(),
                message,
                completion: Some(completion),
            })
        }
        PollOutcome::Failed(message) => Err(UploadError::JobFailed(message)),
        PollOutcome::TimedOut => {
            // Not an error: polling is suspended, the job keeps running
            // server-side.
            let message =
                "Your file is still being processed. Check back shortly.".to_string();
            on_progress(
                UploadProgress::new(UploadPhase::Processing, last_percent, message.clone())
                    .with_job_id(job_id.clone()),
            );
            Ok(UploadResult::Accepted {
                job_id: Some(job_id),
                file_hash: fingerprint.to_string(),
                message,
                completion: None,
            })
        }
    }
}

/// Local duplicate pre-check: computes the fingerprint only. True duplicate
/// detection happens server-side during the upload, so `is_duplicate` is
/// always false here.
pub async fn check_duplicate(path: &Path) -> Result<DuplicateCheck, UploadError> {
    let hash = compute_fingerprint(path).await?;
    Ok(DuplicateCheck {
        is_duplicate: false,
        hash,
    })
}
