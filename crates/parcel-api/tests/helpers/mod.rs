//! Test helpers: build AppState and router over in-process object stores.
//!
//! Run from workspace root: `cargo test -p parcel-api`.

pub mod stores;

use axum_test::TestServer;
use parcel_api::setup::routes;
use parcel_api::state::AppState;
use parcel_core::Config;
use parcel_storage::ObjectStore;
use std::sync::Arc;
use std::time::Duration;

pub use stores::{failing_s3_endpoint, legacy_store, FailingStore, RecordingStore, SlowStore};

pub const TEST_HOST: &str = "http://minio.test:9000";
pub const TEST_BUCKET: &str = "chat-uploads";

/// Test application: server plus the store it writes to.
pub struct TestApp<S> {
    pub server: TestServer,
    pub store: Arc<S>,
}

impl<S> TestApp<S> {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Configuration with in-memory storage; `overrides` win over the defaults.
pub fn create_test_config(overrides: &[(&str, &str)]) -> Config {
    let mut pairs: Vec<(String, String)> = vec![
        ("S3_HOST".into(), TEST_HOST.into()),
        ("S3_BUCKET".into(), TEST_BUCKET.into()),
        ("STORAGE_BACKEND".into(), "memory".into()),
        ("EXPIRE_DAYS".into(), "10".into()),
        ("MAX_FILE_SIZE_MB".into(), "1".into()),
    ];
    for (key, value) in overrides {
        pairs.retain(|(k, _)| k != key);
        pairs.push((key.to_string(), value.to_string()));
    }

    Config::from_lookup(|var| {
        pairs
            .iter()
            .find(|(k, _)| k == var)
            .map(|(_, v)| v.clone())
    })
    .expect("test configuration should be valid")
}

/// Build a test app over `store`.
pub fn setup_test_app_with<S>(store: Arc<S>, config: Config) -> TestApp<S>
where
    S: ObjectStore + 'static,
{
    setup_test_app_with_timeout(store, config, None)
}

/// Build a test app over `store`, optionally shortening the store timeout.
pub fn setup_test_app_with_timeout<S>(
    store: Arc<S>,
    config: Config,
    store_timeout: Option<Duration>,
) -> TestApp<S>
where
    S: ObjectStore + 'static,
{
    let mut state = AppState::new(config, store.clone());
    if let Some(timeout) = store_timeout {
        state.upload.store_timeout = timeout;
    }

    let router = routes::setup_routes(Arc::new(state)).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, store }
}

/// Test app over a recording in-memory store with default configuration.
pub fn setup_test_app() -> TestApp<RecordingStore> {
    setup_test_app_with(
        Arc::new(RecordingStore::new(TEST_HOST, TEST_BUCKET)),
        create_test_config(&[]),
    )
}
