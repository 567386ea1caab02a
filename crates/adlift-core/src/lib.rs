//! Adlift Core Library
//!
//! This crate provides the domain models, error types, constants, and
//! configuration shared by the Adlift upload client and CLI.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::UploadError;
pub use models::{
    DuplicateCheck, JobCompletion, JobState, JobStatusResponse, StreamUploadResponse,
    UploadPhase, UploadProgress, UploadResult,
};
