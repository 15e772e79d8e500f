//! Object stores with scripted behavior.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::Router;
use parcel_core::config::S3Config;
use parcel_core::{SignatureVersion, StorageBackend};
use parcel_storage::{
    LegacyS3Store, MemoryStore, ObjectStore, PutObject, PutReceipt, StorageError, StorageResult,
};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory store that also remembers every key it was asked to write.
pub struct RecordingStore {
    pub inner: MemoryStore,
    attempts: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn new(host: &str, bucket: &str) -> Self {
        Self {
            inner: MemoryStore::new(host, bucket),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put(&self, request: PutObject) -> StorageResult<PutReceipt> {
        self.attempts.lock().unwrap().push(request.key.clone());
        self.inner.put(request).await
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }

    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

/// Store that can never be reached.
pub struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn put(&self, _request: PutObject) -> StorageResult<PutReceipt> {
        Err(StorageError::UploadFailed(
            "error trying to connect: connection refused".to_string(),
        ))
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://unreachable.test/bucket/{}", key)
    }

    fn bucket(&self) -> &str {
        "bucket"
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Store that answers only after `delay`.
pub struct SlowStore {
    pub delay: Duration,
}

#[async_trait]
impl ObjectStore for SlowStore {
    async fn put(&self, _request: PutObject) -> StorageResult<PutReceipt> {
        tokio::time::sleep(self.delay).await;
        Ok(PutReceipt {
            status: 200,
            etag: None,
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://slow.test/bucket/{}", key)
    }

    fn bucket(&self) -> &str {
        "bucket"
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Serve an S3-compatible endpoint on a local port that answers every request
/// with `status` and an XML error body carrying `code`. Returns its base URL.
pub async fn failing_s3_endpoint(status: StatusCode, code: &'static str) -> String {
    let app = Router::new().fallback(move || async move {
        (
            status,
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Error><Code>{}</Code></Error>",
                code
            ),
        )
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Legacy-signing S3 store pointed at `host`.
pub fn legacy_store(host: String, bucket: &str) -> LegacyS3Store {
    LegacyS3Store::new(&S3Config {
        host,
        bucket: bucket.to_string(),
        region: "us-east-1".to_string(),
        access_key: "AKIAEXAMPLE".to_string(),
        secret_key: "wrong-secret".to_string(),
        signature_version: SignatureVersion::Legacy,
    })
    .expect("Failed to build legacy S3 store")
}
