use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Stage of the upload pipeline surfaced to progress observers.
///
/// Phases are strictly ordered except `Error`, which is reachable from any
/// of them. Observers see a non-decreasing walk through the ordered phases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    Hashing,
    Uploading,
    Processing,
    Complete,
    Error,
}

impl UploadPhase {
    /// Position in the ordered walk. `Error` sorts last so a terminal error
    /// event never reads as a backwards transition.
    pub fn ord_index(&self) -> u8 {
        match self {
            UploadPhase::Hashing => 0,
            UploadPhase::Uploading => 1,
            UploadPhase::Processing => 2,
            UploadPhase::Complete => 3,
            UploadPhase::Error => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadPhase::Complete | UploadPhase::Error)
    }
}

impl Display for UploadPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadPhase::Hashing => write!(f, "hashing"),
            UploadPhase::Uploading => write!(f, "uploading"),
            UploadPhase::Processing => write!(f, "processing"),
            UploadPhase::Complete => write!(f, "complete"),
            UploadPhase::Error => write!(f, "error"),
        }
    }
}

impl FromStr for UploadPhase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hashing" => Ok(UploadPhase::Hashing),
            "uploading" => Ok(UploadPhase::Uploading),
            "processing" => Ok(UploadPhase::Processing),
            "complete" => Ok(UploadPhase::Complete),
            "error" => Ok(UploadPhase::Error),
            _ => Err(anyhow::anyhow!("Invalid upload phase: {}", s)),
        }
    }
}

/// Immutable progress snapshot handed to the observer at each transition.
///
/// A fresh value is created per emission and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadProgress {
    pub phase: UploadPhase,
    /// 0–100, monotonically non-decreasing within a phase.
    pub progress: u8,
    /// Human-readable status, server-supplied verbatim during processing.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadProgress {
    pub fn new(phase: UploadPhase, progress: u8, message: impl Into<String>) -> Self {
        Self {
            phase,
            progress: progress.min(100),
            message: message.into(),
            job_id: None,
            error: None,
        }
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
