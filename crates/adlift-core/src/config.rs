//! Configuration module
//!
//! Environment-driven configuration for the upload client. The token is
//! always injected explicitly here or by the caller; the client never reads
//! an ambient credential store on its own.

use std::env;

use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Connection settings for the ingestion API.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the ingestion API, without a trailing slash.
    pub api_url: String,
    /// Bearer token, when the deployment requires authentication.
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { api_url, token }
    }

    /// Build from environment: ADLIFT_API_URL (or API_URL) and
    /// ADLIFT_API_TOKEN. Loads `.env` first when present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = env::var("ADLIFT_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let token = env::var("ADLIFT_API_TOKEN").ok();

        Ok(Self::new(api_url, token))
    }

    /// Same as [`from_env`](Self::from_env) but fails when no token is set,
    /// for deployments where anonymous uploads are rejected outright.
    pub fn from_env_required_token() -> Result<Self> {
        let config = Self::from_env()?;
        if config.token.is_none() {
            return Err(anyhow::anyhow!("Missing token")).context("Set ADLIFT_API_TOKEN");
        }
        Ok(config)
    }
}
