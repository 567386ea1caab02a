//! Content fingerprinting for deduplication.
//!
//! Small files are read into one buffer and hashed in a single pass; files
//! larger than [`STREAMING_HASH_THRESHOLD`] are fed into the digest through
//! a fixed-size buffer so the whole file is never held in memory. Both paths
//! produce the identical SHA-256 digest for identical bytes.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use adlift_core::constants::{HASH_CHUNK_SIZE, STREAMING_HASH_THRESHOLD};
use adlift_core::UploadError;

/// Computes SHA-256 of `data` and returns the hex-encoded digest.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Computes the content fingerprint of the file at `path`.
///
/// Strategy is selected by size: at most the threshold, one buffered read;
/// above it, incremental digest updates over [`HASH_CHUNK_SIZE`] reads.
pub async fn compute_fingerprint(path: &Path) -> Result<String, UploadError> {
    let len = tokio::fs::metadata(path).await?.len();

    if len <= STREAMING_HASH_THRESHOLD {
        let data = tokio::fs::read(path).await?;
        tracing::debug!(bytes = data.len(), "Hashed file in memory");
        Ok(hash_bytes(&data))
    } else {
        hash_file_streaming(path).await
    }
}

/// Incremental hashing path: read, update, discard.
async fn hash_file_streaming(path: &Path) -> Result<String, UploadError> {
    let mut file = File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    tracing::debug!(bytes = total, "Hashed file via streaming reads");
    Ok(hex::encode(hasher.finalize()))
}
