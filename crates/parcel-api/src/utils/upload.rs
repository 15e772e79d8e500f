//! Request parsing helpers for the upload handler

use crate::error::HttpAppError;
use crate::services::IncomingFile;
use axum::extract::Multipart;
use axum::http::{HeaderMap, HeaderName};
use bytes::BytesMut;
use parcel_core::constants::{CHANNEL_ID_HEADER, FILE_FIELD, USER_ID_HEADER};
use parcel_core::{AppError, CorrelationIds};

/// Read the single `file` part of a multipart form.
///
/// Other fields are skipped. A second `file` field, a `file` part without a
/// filename, or a file larger than `max_size` bytes are rejected.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<IncomingFile, HttpAppError> {
    let mut file: Option<IncomingFile> = None;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            )
            .into());
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::InvalidInput("File part has no filename".to_string()))?;

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await? {
            if data.len() + chunk.len() > max_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "File size exceeds maximum allowed size of {} MB",
                    max_size / 1024 / 1024
                ))
                .into());
            }
            data.extend_from_slice(&chunk);
        }

        file = Some(IncomingFile {
            filename,
            data: data.freeze(),
        });
    }

    file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()).into())
}

/// `X-User-Id` / `X-Channel-Id` from the request. Missing or non-text values are `None`.
pub fn correlation_ids(headers: &HeaderMap) -> CorrelationIds {
    let text = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    CorrelationIds {
        user_id: text(USER_ID_HEADER),
        channel_id: text(CHANNEL_ID_HEADER),
    }
}

/// Copy the correlation headers present on the request onto `response`, byte for byte.
pub fn echo_correlation_headers(request: &HeaderMap, response: &mut HeaderMap) {
    let names = [
        HeaderName::from_static("x-user-id"),
        HeaderName::from_static("x-channel-id"),
    ];
    for name in names {
        if let Some(value) = request.get(&name) {
            response.insert(name.clone(), value.clone());
        }
    }
}
