//! Storage setup and initialization

use anyhow::Result;
use parcel_core::Config;
use parcel_storage::{create_store, ObjectStore};
use std::sync::Arc;

/// Build the configured object store.
pub fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStore>> {
    tracing::info!("Initializing object store...");
    let store = create_store(config)?;
    tracing::info!(
        backend = ?store.backend_type(),
        bucket = %store.bucket(),
        "Object store initialized successfully"
    );
    Ok(store)
}
