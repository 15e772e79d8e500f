//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a serving router.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use parcel_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(&config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    crate::error::set_hide_error_details(config.is_production());

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        "Configuration loaded and validated successfully"
    );

    let store = storage::setup_storage(&config)?;
    let state = Arc::new(AppState::new(config, store));

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
