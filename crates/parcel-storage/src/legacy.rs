//! S3 client using the legacy `s3` signature scheme.
//!
//! Many third-party S3-compatible servers only accept the original S3 REST
//! authentication: `Authorization: AWS {access_key}:{signature}` where the
//! signature is base64(HMAC-SHA1(secret, string_to_sign)) and
//!
//! ```text
//! string_to_sign = VERB \n Content-MD5 \n Content-Type \n Date \n
//!                  CanonicalizedAmzHeaders CanonicalizedResource
//! ```
//!
//! Requests always use path-style addressing (`{host}/{bucket}/{key}`).

use crate::keys;
use crate::traits::{ObjectStore, PutObject, PutReceipt, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use parcel_core::config::S3Config;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, DATE, ETAG, EXPIRES};
use sha1::Sha1;

const AMZ_ACL_HEADER: &str = "x-amz-acl";
/// Longest error body excerpt carried into a `Rejected` error.
const MAX_ERROR_BODY: usize = 512;

/// S3 storage implementation signing requests with the legacy scheme
#[derive(Clone)]
pub struct LegacyS3Store {
    client: reqwest::Client,
    host: String,
    bucket: String,
    access_key: String,
    secret_key: String,
}

impl LegacyS3Store {
    pub fn new(config: &S3Config) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            host: config.host.clone(),
            bucket: config.bucket.clone(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
        })
    }

    /// Signature for `string_to_sign` with this store's secret key.
    fn sign(&self, string_to_sign: &str) -> String {
        sign(&self.secret_key, string_to_sign)
    }
}

/// base64(HMAC-SHA1(secret, string_to_sign))
pub fn sign(secret_key: &str, string_to_sign: &str) -> String {
    let mut mac =
        Hmac::<Sha1>::new_from_slice(secret_key.as_bytes()).expect("HMAC accepts any key size");
    mac.update(string_to_sign.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Build the canonical string to sign.
///
/// `amz_headers` must already be lowercase; they are sorted here.
pub fn string_to_sign(
    method: &str,
    content_md5: &str,
    content_type: &str,
    date: &str,
    amz_headers: &[(&str, &str)],
    resource: &str,
) -> String {
    let mut headers: Vec<_> = amz_headers.to_vec();
    headers.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = format!("{}\n{}\n{}\n{}\n", method, content_md5, content_type, date);
    for (name, value) in headers {
        out.push_str(name);
        out.push(':');
        out.push_str(value.trim());
        out.push('\n');
    }
    out.push_str(resource);
    out
}

/// RFC 7231 IMF-fixdate, as used by `Date` and `Expires`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Pull `<Code>` out of an S3 XML error body, if present.
fn error_code(body: &str) -> Option<&str> {
    let start = body.find("<Code>")? + "<Code>".len();
    let end = body[start..].find("</Code>")? + start;
    Some(&body[start..end])
}

#[async_trait]
impl ObjectStore for LegacyS3Store {
    async fn put(&self, request: PutObject) -> StorageResult<PutReceipt> {
        keys::validate_key(&request.key)?;

        let resource = keys::object_path(&self.bucket, &request.key);
        let date = http_date(Utc::now());
        let acl = request.acl.as_str();
        let to_sign = string_to_sign(
            "PUT",
            "",
            &request.content_type,
            &date,
            &[(AMZ_ACL_HEADER, acl)],
            &resource,
        );
        let authorization = format!("AWS {}:{}", self.access_key, self.sign(&to_sign));

        let size = request.body.len() as u64;
        let start = std::time::Instant::now();

        let response = self
            .client
            .put(format!("{}{}", self.host, resource))
            .header(DATE, &date)
            .header(CONTENT_TYPE, &request.content_type)
            .header(EXPIRES, http_date(request.expires))
            .header(AMZ_ACL_HEADER, acl)
            .header(AUTHORIZATION, authorization)
            .body(request.body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %request.key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let code = error_code(&body);
            let reason = match code {
                Some(code) => format!("{} {}", status.as_u16(), code),
                None => {
                    let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
                    format!("{} {}", status.as_u16(), excerpt.trim())
                }
            };
            let err = StorageError::from_status(status.as_u16(), code, reason);
            tracing::warn!(
                status = status.as_u16(),
                error = %err,
                bucket = %self.bucket,
                key = %request.key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload not acknowledged"
            );
            return Err(err);
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_matches('"').to_string());

        tracing::info!(
            bucket = %self.bucket,
            key = %request.key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(PutReceipt {
            status: status.as_u16(),
            etag,
        })
    }

    fn public_url(&self, key: &str) -> String {
        keys::public_url(&self.host, &self.bucket, key)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
