pub mod job;
pub mod progress;
pub mod upload;

pub use job::{JobCompletion, JobState, JobStatusResponse};
pub use progress::{UploadPhase, UploadProgress};
pub use upload::{DuplicateCheck, StreamUploadResponse, UploadResult};
