//! Shared constants for the upload pipeline.

use std::time::Duration;

/// Files larger than this are hashed incrementally instead of in one buffer.
pub const STREAMING_HASH_THRESHOLD: u64 = 10 * 1024 * 1024;

/// Read buffer size for the incremental hashing path.
pub const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Delay between two consecutive job-status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Poll attempts before the pipeline reports the job as still processing.
pub const MAX_POLL_ATTEMPTS: u32 = 60;

/// Poll attempts for the extended (page-level) variant.
pub const MAX_POLL_ATTEMPTS_EXTENDED: u32 = 120;

/// Anti-forgery header attached to every mutating request.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// Ingestion endpoint paths, relative to the configured API base.
pub const UPLOAD_STREAM_PATH: &str = "/upload/stream";
pub const UPLOAD_STATUS_PATH: &str = "/upload/status";
