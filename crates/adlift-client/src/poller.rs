//! Bounded polling of a server-side import job.
//!
//! One status fetch per tick at a fixed interval, no backoff. The loop ends
//! on a terminal server status, on the attempt bound (a non-error outcome:
//! the job is presumed still running server-side), or on the first network
//! failure. Terminal payloads are relayed untouched.

use std::time::Duration;

use reqwest::StatusCode;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use adlift_core::constants::{MAX_POLL_ATTEMPTS, MAX_POLL_ATTEMPTS_EXTENDED, POLL_INTERVAL, UPLOAD_STATUS_PATH};
use adlift_core::{JobCompletion, JobState, JobStatusResponse, UploadError, UploadPhase, UploadProgress};

use crate::transport::extract_error_detail;
use crate::UploadClient;

/// Attempt bound and tick interval for one polling loop.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_POLL_ATTEMPTS,
            interval: POLL_INTERVAL,
        }
    }
}

impl PollPolicy {
    /// Page-level variant: twice the attempt budget of the base pipeline.
    pub fn extended() -> Self {
        Self {
            max_attempts: MAX_POLL_ATTEMPTS_EXTENDED,
            interval: POLL_INTERVAL,
        }
    }
}

/// Terminal outcome of a polling loop.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// Job finished; payload copied verbatim from the last status response.
    Completed(JobCompletion),
    /// Job reached terminal `failed`; server message verbatim.
    Failed(String),
    /// Attempt bound exceeded without a terminal status. Not an error: the
    /// job is presumably still running server-side.
    TimedOut,
}

/// Track `job_id` to a terminal state, emitting one progress event per
/// non-terminal poll (server fraction scaled to 0–100, message verbatim).
pub async fn poll_job<F>(
    client: &UploadClient,
    job_id: &str,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> Result<PollOutcome, UploadError>
where
    F: FnMut(UploadProgress),
{
    for attempt in 1..=policy.max_attempts {
        if cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }

        let status = fetch_status(client, job_id).await?;
        tracing::debug!(
            job_id = %job_id,
            attempt = attempt,
            state = %status.status,
            progress = status.progress,
            "Polled job status"
        );

        match status.status {
            JobState::Completed => {
                tracing::info!(job_id = %job_id, row_count = ?status.row_count, "Job completed");
                return Ok(PollOutcome::Completed(JobCompletion::from(status)));
            }
            JobState::Failed => {
                let message = status
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or(status.message);
                tracing::warn!(job_id = %job_id, error = %message, "Job failed server-side");
                return Ok(PollOutcome::Failed(message));
            }
            JobState::Accepted | JobState::Running => {
                let percent = (status.progress.clamp(0.0, 1.0) * 100.0).round() as u8;
                on_progress(
                    UploadProgress::new(UploadPhase::Processing, percent, status.message)
                        .with_job_id(job_id),
                );
            }
        }

        if attempt < policy.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => return Err(UploadError::Cancelled),
                _ = sleep(policy.interval) => {}
            }
        }
    }

    tracing::warn!(
        job_id = %job_id,
        attempts = policy.max_attempts,
        "Polling suspended; job still processing server-side"
    );
    Ok(PollOutcome::TimedOut)
}

/// One status fetch. Network failure or a non-2xx is fatal to the loop; a
/// 401 additionally broadcasts the session-expiry signal.
async fn fetch_status(client: &UploadClient, job_id: &str) -> Result<JobStatusResponse, UploadError> {
    let url = client.build_url(&format!("{}/{}", UPLOAD_STATUS_PATH, job_id));
    let request = client.client().get(&url);
    let request = client.apply_auth(request);

    let response = request
        .send()
        .await
        .map_err(|e| UploadError::network(format!("Failed to poll job status: {}", e)))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
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

    response
        .json::<JobStatusResponse>()
        .await
        .map_err(|e| UploadError::network(format!("Failed to parse job status: {}", e)))
}
