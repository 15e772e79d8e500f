//! Shared key and URL helpers for storage backends.
//!
//! Path-style layout: an object lives at `/{bucket}/{key}` relative to the
//! endpoint, and its public URL is the endpoint followed by that path.

use crate::traits::{StorageError, StorageResult};

/// Reject keys that could escape the bucket or produce an ambiguous path.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key is empty".to_string()));
    }
    if key.starts_with('/') || key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Path-style resource for `key` in `bucket`: `/{bucket}/{key}`.
pub fn object_path(bucket: &str, key: &str) -> String {
    format!("/{}/{}", bucket, key)
}

/// Public URL: `{host}/{bucket}/{key}`. No percent-encoding is applied, so
/// keys are expected to be URL-safe (generated keys are UUIDs).
pub fn public_url(host: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", host, bucket, key)
}
