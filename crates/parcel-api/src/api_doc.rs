//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use parcel_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parcel API",
        version = "0.1.0",
        description = "Single-file upload service. Files are written to an S3-compatible store under a random key with a public-read ACL and an expiry."
    ),
    paths(
        handlers::upload::upload_object,
        handlers::health::liveness_check,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::ObjectKind,
            models::CorrelationIds,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "upload", description = "File upload"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
