//! Application state shared by all handlers.

use parcel_core::{Config, CorrelationMode};
use parcel_storage::ObjectStore;
use std::sync::Arc;
use std::time::Duration;

/// Per-upload policy derived from configuration.
#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub expire_days: i64,
    pub store_timeout: Duration,
    pub max_file_size: usize,
    pub correlation_mode: CorrelationMode,
}

impl UploadSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            expire_days: config.expire_days,
            store_timeout: config.store_timeout(),
            max_file_size: config.max_file_size_bytes(),
            correlation_mode: config.correlation_mode,
        }
    }
}

/// Immutable for the process lifetime; handlers get it behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ObjectStore>,
    pub upload: UploadSettings,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ObjectStore>) -> Self {
        let upload = UploadSettings::from_config(&config);
        Self {
            config,
            store,
            upload,
        }
    }
}
