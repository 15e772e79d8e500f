//! Parcel Storage Library
//!
//! This crate provides the object store abstraction and its implementations:
//! S3-compatible endpoints (legacy `s3` signatures or SigV4 through the SDK) and
//! an in-memory store for development and tests.
//!
//! # Addressing
//!
//! All backends use path-style addressing: an object `key` in `bucket` lives at
//! `{host}/{bucket}/{key}`, and that is also its public URL. Keys must not
//! contain `..` or start with `/`; see the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-s3")]
pub mod legacy;
#[cfg(feature = "storage-memory")]
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_store;
#[cfg(feature = "storage-s3")]
pub use legacy::LegacyS3Store;
#[cfg(feature = "storage-memory")]
pub use memory::{MemoryObject, MemoryStore};
pub use parcel_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Store;
pub use traits::{ObjectAcl, ObjectStore, PutObject, PutReceipt, StorageError, StorageResult};
