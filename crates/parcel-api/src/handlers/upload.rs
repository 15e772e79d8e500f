use crate::error::{ErrorResponse, HttpAppError};
use crate::services::UploadService;
use crate::state::AppState;
use crate::utils::upload::{correlation_ids, echo_correlation_headers, extract_multipart_file};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use parcel_core::{CorrelationMode, UploadResponse};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "upload",
    params(
        ("X-User-Id" = Option<String>, Header, description = "Caller user id, echoed back"),
        ("X-Channel-Id" = Option<String>, Header, description = "Caller channel id, echoed back")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file part, or the store did not acknowledge the write", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Object store unreachable", body = ErrorResponse),
        (status = 504, description = "Object store did not answer in time", body = ErrorResponse)
    )
)]
pub async fn upload_object(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    let multipart = multipart?;
    let correlation = correlation_ids(&headers);

    let file = extract_multipart_file(multipart, state.upload.max_file_size).await?;

    tracing::info!(
        filename = %file.filename,
        size_bytes = file.data.len(),
        user_id = correlation.user_id.as_deref(),
        channel_id = correlation.channel_id.as_deref(),
        "Upload received"
    );

    let stored = UploadService::new(&state).upload(file).await?;

    tracing::info!(
        object_id = %stored.id,
        object_kind = stored.kind.as_str(),
        url = %stored.url,
        "Upload stored"
    );

    let mode = state.upload.correlation_mode;
    let body = UploadResponse::new(&stored, &correlation, mode);
    let mut response = Json(body).into_response();

    if mode == CorrelationMode::Headers {
        echo_correlation_headers(&headers, response.headers_mut());
    }

    Ok(response)
}
