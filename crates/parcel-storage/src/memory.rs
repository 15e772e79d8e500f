//! In-process object store.
//!
//! Keeps every written object in a map. Used by tests and for running the
//! service locally without an S3 endpoint; nothing survives a restart.

use crate::keys;
use crate::traits::{ObjectAcl, ObjectStore, PutObject, PutReceipt, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// A stored object as the memory store recorded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryObject {
    pub body: Bytes,
    pub acl: ObjectAcl,
    pub content_type: String,
    pub expires: DateTime<Utc>,
}

pub struct MemoryStore {
    host: String,
    bucket: String,
    objects: RwLock<HashMap<String, MemoryObject>>,
    reject_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new(host: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
            reject_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent writes fail as if the store refused them.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn get(&self, key: &str) -> Option<MemoryObject> {
        self.objects.read().ok()?.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .read()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, request: PutObject) -> StorageResult<PutReceipt> {
        keys::validate_key(&request.key)?;

        if self.reject_writes.load(Ordering::SeqCst) {
            tracing::warn!(key = %request.key, "Memory store rejecting write");
            return Err(StorageError::Rejected(
                "memory store is rejecting writes".to_string(),
            ));
        }

        let size = request.body.len();
        let object = MemoryObject {
            body: request.body,
            acl: request.acl,
            content_type: request.content_type,
            expires: request.expires,
        };

        self.objects
            .write()
            .map_err(|e| StorageError::BackendError(e.to_string()))?
            .insert(request.key.clone(), object);

        tracing::debug!(
            bucket = %self.bucket,
            key = %request.key,
            size_bytes = size,
            "Memory store write"
        );

        Ok(PutReceipt {
            status: 200,
            etag: None,
        })
    }

    fn public_url(&self, key: &str) -> String {
        keys::public_url(&self.host, &self.bucket, key)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
