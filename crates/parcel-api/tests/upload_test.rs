mod helpers;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use helpers::{
    create_test_config, failing_s3_endpoint, legacy_store, setup_test_app, setup_test_app_with,
    setup_test_app_with_timeout, FailingStore, RecordingStore, SlowStore, TEST_BUCKET, TEST_HOST,
};
use parcel_storage::ObjectAcl;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

fn file_form(filename: &str, data: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part("file", Part::bytes(data.to_vec()).file_name(filename))
}

fn user_id() -> HeaderName {
    HeaderName::from_static("x-user-id")
}

fn channel_id() -> HeaderName {
    HeaderName::from_static("x-channel-id")
}

#[tokio::test]
async fn test_upload_image_returns_public_url() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.png", b"\x89PNG fake image"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["type"], "img");
    assert_eq!(body["orginal_filename"], "cat.png");

    let keys = app.store.inner.keys();
    assert_eq!(keys.len(), 1);
    assert_eq!(
        body["s3_url"],
        format!("{}/{}/{}", TEST_HOST, TEST_BUCKET, keys[0])
    );
    assert!(uuid::Uuid::parse_str(&keys[0]).is_ok());

    let object = app.store.inner.get(&keys[0]).unwrap();
    assert_eq!(object.acl, ObjectAcl::PublicRead);
    assert_eq!(object.content_type, "image/png");
    assert_eq!(object.body.as_ref(), b"\x89PNG fake image");
}

#[tokio::test]
async fn test_uppercase_jpg_is_classified_as_jpeg_image() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("photo.JPG", b"jpeg bytes"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["type"], "img");
    assert_eq!(body["orginal_filename"], "photo.JPG");

    let key = app.store.inner.keys().remove(0);
    assert_eq!(app.store.inner.get(&key).unwrap().content_type, "image/jpeg");
}

#[tokio::test]
async fn test_non_image_is_stored_as_octet_stream() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("archive.tar.gz", b"gzip bytes"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["type"], "file");
    assert_eq!(body["orginal_filename"], "archive.tar.gz");

    let key = app.store.inner.keys().remove(0);
    let object = app.store.inner.get(&key).unwrap();
    assert_eq!(object.content_type, "application/octet-stream");
    assert_eq!(object.acl, ObjectAcl::PublicRead);
}

#[tokio::test]
async fn test_same_filename_gets_distinct_keys() {
    let app = setup_test_app();

    for _ in 0..2 {
        let response = app
            .client()
            .post("/upload")
            .multipart(file_form("notes.txt", b"same content"))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    assert_eq!(app.store.inner.len(), 2);
}

#[tokio::test]
async fn test_correlation_headers_are_echoed() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/upload")
        .add_header(user_id(), HeaderValue::from_static("u-42"))
        .add_header(channel_id(), HeaderValue::from_static("general"))
        .multipart(file_form("cat.png", b"img"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.headers().get("x-user-id").unwrap(), "u-42");
    assert_eq!(response.headers().get("x-channel-id").unwrap(), "general");

    let body: Value = response.json();
    assert!(body.get("headers").is_none());
}

#[tokio::test]
async fn test_absent_correlation_headers_are_omitted() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/upload")
        .add_header(user_id(), HeaderValue::from_static("u-42"))
        .multipart(file_form("cat.png", b"img"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.headers().get("x-user-id").unwrap(), "u-42");
    assert!(response.headers().get("x-channel-id").is_none());
}

#[tokio::test]
async fn test_correlation_ids_in_body_mode() {
    let app = setup_test_app_with(
        Arc::new(RecordingStore::new(TEST_HOST, TEST_BUCKET)),
        create_test_config(&[("CORRELATION_MODE", "body")]),
    );

    let response = app
        .client()
        .post("/upload")
        .add_header(user_id(), HeaderValue::from_static("u-42"))
        .multipart(file_form("cat.png", b"img"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.headers().get("x-user-id").is_none());

    let body: Value = response.json();
    assert_eq!(body["headers"]["X-User-Id"], "u-42");
    assert!(body["headers"].get("X-Channel-Id").is_none());
}

#[tokio::test]
async fn test_missing_file_part_is_bad_request() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_text("comment", "no file here");
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(app.store.attempts().is_empty());
}

#[tokio::test]
async fn test_file_part_without_filename_is_bad_request() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_part("file", Part::bytes(b"data".to_vec()));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(app.store.attempts().is_empty());
}

#[tokio::test]
async fn test_non_multipart_body_is_bad_request() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/upload")
        .json(&serde_json::json!({ "file": "cat.png" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(app.store.attempts().is_empty());
}

#[tokio::test]
async fn test_rejected_write_reports_upload_failure() {
    let app = setup_test_app();
    app.store.inner.set_reject_writes(true);

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.png", b"img"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "UPLOAD_FAILED");
    assert_eq!(body["error"], "Something went wrong when uploading to s3");
    assert!(body.get("s3_url").is_none());
    assert_eq!(app.store.attempts().len(), 1);
    assert!(app.store.inner.is_empty());
}

#[tokio::test]
async fn test_retry_after_rejection_uses_fresh_key() {
    let app = setup_test_app();
    app.store.inner.set_reject_writes(true);

    let first = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.png", b"img"))
        .await;
    assert_eq!(first.status_code(), StatusCode::BAD_REQUEST);

    app.store.inner.set_reject_writes(false);
    let second = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.png", b"img"))
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);

    let attempts = app.store.attempts();
    assert_eq!(attempts.len(), 2);
    assert_ne!(attempts[0], attempts[1]);
}

#[tokio::test]
async fn test_unreachable_store_is_server_error() {
    let app = setup_test_app_with(Arc::new(FailingStore), create_test_config(&[]));

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.png", b"img"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert_eq!(body["recoverable"], true);
}

#[tokio::test]
async fn test_store_refusing_credentials_is_server_error() {
    let host = failing_s3_endpoint(StatusCode::FORBIDDEN, "InvalidAccessKeyId").await;
    let app = setup_test_app_with(
        Arc::new(legacy_store(host, TEST_BUCKET)),
        create_test_config(&[]),
    );

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("a.png", b"img"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
}

#[tokio::test]
async fn test_store_missing_bucket_is_server_error() {
    let host = failing_s3_endpoint(StatusCode::NOT_FOUND, "NoSuchBucket").await;
    let app = setup_test_app_with(
        Arc::new(legacy_store(host, TEST_BUCKET)),
        create_test_config(&[]),
    );

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("a.png", b"img"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_store_unacknowledged_write_is_upload_failure() {
    let host = failing_s3_endpoint(StatusCode::BAD_REQUEST, "InvalidRequest").await;
    let app = setup_test_app_with(
        Arc::new(legacy_store(host, TEST_BUCKET)),
        create_test_config(&[]),
    );

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("a.png", b"img"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "UPLOAD_FAILED");
}

#[tokio::test]
async fn test_slow_store_times_out() {
    let app = setup_test_app_with_timeout(
        Arc::new(SlowStore {
            delay: Duration::from_secs(5),
        }),
        create_test_config(&[]),
        Some(Duration::from_millis(50)),
    );

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.png", b"img"))
        .await;

    assert_eq!(response.status_code(), StatusCode::GATEWAY_TIMEOUT);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_TIMEOUT");
}

#[tokio::test]
async fn test_oversized_file_is_rejected() {
    let app = setup_test_app();
    let data = vec![0u8; 1024 * 1024 + 1];

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("big.bin", &data))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.store.attempts().is_empty());
}

#[tokio::test]
async fn test_health_is_alive() {
    let app = setup_test_app();

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app();

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["paths"].get("/upload").is_some());
}
