//! Object store abstraction trait
//!
//! This module defines the ObjectStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parcel_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store answered but did not acknowledge the write.
    #[error("Upload rejected: {0}")]
    Rejected(String),

    /// The request never got a usable answer (connect, TLS, I/O).
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Map a non-2xx store answer to an error.
    ///
    /// Auth and permission failures (401/403), a missing bucket and the store's
    /// own 5xx answers are backend failures. Any other answer is a write the
    /// store received but did not acknowledge.
    pub fn from_status(status: u16, code: Option<&str>, reason: String) -> Self {
        let missing_bucket = status == 404 && code == Some("NoSuchBucket");
        if status == 401 || status == 403 || missing_bucket || status >= 500 {
            StorageError::BackendError(reason)
        } else {
            StorageError::Rejected(reason)
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Rejected(msg) => AppError::StoreRejected(msg),
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::InvalidKey(msg) => AppError::Internal(format!("Invalid storage key: {}", msg)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Canned access control policy applied to a written object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAcl {
    Private,
    PublicRead,
}

impl ObjectAcl {
    /// Value of the `x-amz-acl` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectAcl::Private => "private",
            ObjectAcl::PublicRead => "public-read",
        }
    }
}

/// A single object write.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub body: Bytes,
    pub acl: ObjectAcl,
    /// Sent as the object's `Expires` header.
    pub expires: DateTime<Utc>,
    /// Always set explicitly; the store's default is never used.
    pub content_type: String,
}

/// Acknowledgement of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    pub status: u16,
    pub etag: Option<String>,
}

/// Object store abstraction
///
/// The upload pipeline only ever writes; reading, listing and deleting are
/// left to the store's own public interface.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write one object. Returns `Rejected` when the store answers without
    /// acknowledging the write, `BackendError` on auth, permission, missing
    /// bucket or server failures, and `UploadFailed` when it cannot be reached.
    async fn put(&self, request: PutObject) -> StorageResult<PutReceipt>;

    /// Public URL of `key`: `{host}/{bucket}/{key}`.
    fn public_url(&self, key: &str) -> String;

    fn bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
