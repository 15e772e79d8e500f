//! Parcel Core Library
//!
//! This crate provides the domain models, upload classification rules, error types
//! and configuration shared by the storage and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ClassifiedObject, CorrelationIds, ObjectKind, StoredObject, UploadResponse};
pub use storage_types::{CorrelationMode, SignatureVersion, StorageBackend};
