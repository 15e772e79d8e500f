#[cfg(feature = "storage-s3")]
use crate::{LegacyS3Store, S3Store};
#[cfg(feature = "storage-memory")]
use crate::MemoryStore;
use crate::{ObjectStore, StorageBackend, StorageError, StorageResult};
use parcel_core::{Config, SignatureVersion};
use std::sync::Arc;

/// Create an object store based on configuration
pub fn create_store(config: &Config) -> StorageResult<Arc<dyn ObjectStore>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let store: Arc<dyn ObjectStore> = match config.s3.signature_version {
                SignatureVersion::Legacy => Arc::new(LegacyS3Store::new(&config.s3)?),
                SignatureVersion::V4 => Arc::new(S3Store::new(&config.s3)),
            };
            tracing::info!(
                host = %config.s3.host,
                bucket = %config.s3.bucket,
                signature_version = %config.s3.signature_version,
                "S3 object store configured (path-style addressing)"
            );
            Ok(store)
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory object store; uploads are not persisted");
            Ok(Arc::new(MemoryStore::new(
                config.s3.host.clone(),
                config.s3.bucket.clone(),
            )))
        }

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory storage backend not available (storage-memory feature not enabled)"
                .to_string(),
        )),
    }
}
