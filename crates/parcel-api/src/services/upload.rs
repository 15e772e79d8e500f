//! Upload pipeline: classify, write once to the object store, describe the result.

use crate::state::{AppState, UploadSettings};
use bytes::Bytes;
use chrono::{Duration, Utc};
use parcel_core::models::StoredObject;
use parcel_core::{AppError, ClassifiedObject};
use parcel_storage::{ObjectAcl, ObjectStore, PutObject};

/// The `file` part of an upload request.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub data: Bytes,
}

pub struct UploadService<'a> {
    store: &'a dyn ObjectStore,
    settings: &'a UploadSettings,
}

impl<'a> UploadService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self::with_store(state.store.as_ref(), &state.upload)
    }

    pub fn with_store(store: &'a dyn ObjectStore, settings: &'a UploadSettings) -> Self {
        Self { store, settings }
    }

    /// Store `file` under a fresh identifier as a public-read object.
    ///
    /// Exactly one write is attempted. A write that is not acknowledged within
    /// the configured store timeout fails with `StorageTimeout`.
    pub async fn upload(&self, file: IncomingFile) -> Result<StoredObject, AppError> {
        let object = ClassifiedObject::classify(&file.filename);
        let key = object.key();
        let expires = Utc::now() + Duration::days(self.settings.expire_days);
        let size = file.data.len();

        tracing::debug!(
            key = %key,
            original_filename = %file.filename,
            extension = %object.extension,
            content_type = %object.content_type,
            object_kind = object.kind.as_str(),
            size_bytes = size,
            "Classified upload"
        );

        let request = PutObject {
            key: key.clone(),
            body: file.data,
            acl: ObjectAcl::PublicRead,
            expires,
            content_type: object.content_type.clone(),
        };

        let receipt =
            match tokio::time::timeout(self.settings.store_timeout, self.store.put(request)).await
            {
                Ok(result) => result?,
                Err(_) => {
                    tracing::error!(
                        key = %key,
                        bucket = %self.store.bucket(),
                        timeout_secs = self.settings.store_timeout.as_secs(),
                        "Object store write timed out"
                    );
                    return Err(AppError::StorageTimeout(self.settings.store_timeout.as_secs()));
                }
            };

        Ok(StoredObject {
            id: object.id,
            kind: object.kind,
            content_type: object.content_type,
            url: self.store.public_url(&key),
            etag: receipt.etag,
            original_filename: file.filename,
        })
    }
}
