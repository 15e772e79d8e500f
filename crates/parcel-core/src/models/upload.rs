use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::constants::{IMAGE_EXTENSIONS, OCTET_STREAM};
use crate::storage_types::CorrelationMode;

/// Kind of stored object. Serialized as `"img"` / `"file"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ObjectKind {
    #[serde(rename = "img")]
    Image,
    #[serde(rename = "file")]
    File,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Image => "img",
            ObjectKind::File => "file",
        }
    }
}

/// Lowercased extension of `filename` with `"jpg"` rewritten to `"jpeg"`.
///
/// Only the final path segment is considered and leading dots are ignored, so
/// `".profile"` and `"README"` have no extension. The `jpg` rewrite is a plain
/// substring replace on the extension text, not content sniffing.
pub fn normalize_extension(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem = base.trim_start_matches('.');

    match stem.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase().replace("jpg", "jpeg"),
        None => String::new(),
    }
}

/// An upload after identifier generation and content classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedObject {
    /// Object key. Always freshly generated, never derived from the filename.
    pub id: Uuid,
    pub extension: String,
    pub content_type: String,
    pub kind: ObjectKind,
}

impl ClassifiedObject {
    /// Classify `filename` under a new random identifier.
    pub fn classify(filename: &str) -> Self {
        Self::with_id(Uuid::new_v4(), filename)
    }

    pub fn with_id(id: Uuid, filename: &str) -> Self {
        let extension = normalize_extension(filename);

        let (kind, content_type) = if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            (ObjectKind::Image, format!("image/{}", extension))
        } else {
            (ObjectKind::File, OCTET_STREAM.to_string())
        };

        Self {
            id,
            extension,
            content_type,
            kind,
        }
    }

    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

/// Outcome of a successful store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub id: Uuid,
    pub kind: ObjectKind,
    pub content_type: String,
    pub url: String,
    pub etag: Option<String>,
    pub original_filename: String,
}

/// Caller-supplied correlation identifiers, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CorrelationIds {
    #[serde(rename = "X-User-Id", skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<String>,
    #[serde(rename = "X-Channel-Id", skip_serializing_if = "Option::is_none", default)]
    pub channel_id: Option<String>,
}

impl CorrelationIds {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.channel_id.is_none()
    }
}

/// JSON body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub s3_url: String,
    /// Field name kept as published to existing clients.
    pub orginal_filename: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub headers: Option<CorrelationIds>,
}

impl UploadResponse {
    /// Build the body for `stored`. Correlation ids are only embedded in
    /// [`CorrelationMode::Body`]; header mode leaves them to the HTTP layer.
    pub fn new(stored: &StoredObject, correlation: &CorrelationIds, mode: CorrelationMode) -> Self {
        let headers = match mode {
            CorrelationMode::Body => Some(correlation.clone()),
            CorrelationMode::Headers => None,
        };

        Self {
            kind: stored.kind,
            s3_url: stored.url.clone(),
            orginal_filename: stored.original_filename.clone(),
            headers,
        }
    }
}
