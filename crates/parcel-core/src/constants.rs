//! Shared constants for the upload pipeline.

/// Request/response header carrying the caller's user identifier.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Request/response header carrying the caller's channel identifier.
pub const CHANNEL_ID_HEADER: &str = "X-Channel-Id";

/// Multipart field that holds the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Extensions (after normalization) that are stored as images.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Content type for everything that is not an image.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Client message returned when the object store does not acknowledge a write.
pub const UPLOAD_FAILED_MESSAGE: &str = "Something went wrong when uploading to s3";

pub const DEFAULT_EXPIRE_DAYS: i64 = 10;
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 50;
pub const DEFAULT_S3_REGION: &str = "us-east-1";
pub const DEFAULT_PORT: u16 = 4000;
