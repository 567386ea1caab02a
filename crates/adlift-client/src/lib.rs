//! HTTP client for the Adlift ingestion API.
//!
//! Provides [`UploadClient`] (reqwest wrapper with configurable auth and a
//! session-expiry broadcast) and the three pipeline layers built on top of
//! it: content hashing ([`hasher`]), multipart submission ([`transport`]),
//! and job polling ([`poller`]), orchestrated end to end by [`pipeline`].

pub mod hasher;
pub mod pipeline;
pub mod poller;
pub mod transport;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::sync::broadcast;

use adlift_core::constants::{REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE};
use adlift_core::ClientConfig;

/// Authentication strategy for the ingestion API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// No Authorization header; deployments that allow anonymous uploads.
    None,
}

/// HTTP client for the ingestion API.
///
/// The token is injected at construction; the client never reads an ambient
/// credential store. A 401 from any request fires one signal on the
/// session-expiry broadcast channel so a long-lived shell can react once for
/// all in-flight calls, independently of the error each call returns.
#[derive(Clone, Debug)]
pub struct UploadClient {
    client: Client,
    base_url: String,
    auth: Auth,
    session_expired_tx: broadcast::Sender<()>,
}

impl UploadClient {
    pub fn new(base_url: impl Into<String>, auth: Auth) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        // Capacity 16: signals are momentary, a lagging subscriber only
        // needs to observe that at least one fired.
        let (session_expired_tx, _) = broadcast::channel(16);

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            session_expired_tx,
        })
    }

    /// Create a client from [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let auth = match &config.token {
            Some(token) => Auth::Bearer(token.clone()),
            None => Auth::None,
        };
        Self::new(config.api_url.clone(), auth)
    }

    /// Create a client from environment: ADLIFT_API_URL (or API_URL) and
    /// ADLIFT_API_TOKEN.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::from_config(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Subscribe to session-expiry signals. One `()` is sent per 401
    /// observed by this client.
    pub fn subscribe_session_expired(&self) -> broadcast::Receiver<()> {
        self.session_expired_tx.subscribe()
    }

    pub(crate) fn notify_session_expired(&self) {
        // Send fails only when no subscriber exists, which is fine.
        let _ = self.session_expired_tx.send(());
    }

    pub(crate) fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::None => request,
        }
    }

    /// Attach the fixed anti-forgery header required on mutating requests.
    pub(crate) fn apply_anti_forgery(
        &self,
        request: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        request.header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}

// Re-export the caller-facing surface.
pub use adlift_core::{
    DuplicateCheck, JobCompletion, JobState, JobStatusResponse, UploadError, UploadPhase,
    UploadProgress, UploadResult,
};
pub use hasher::compute_fingerprint;
pub use pipeline::{check_duplicate, upload_with_progress, UploadOptions};
pub use poller::{poll_job, PollOutcome, PollPolicy};
pub use transport::TransportOutcome;
