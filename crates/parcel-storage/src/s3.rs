use crate::keys;
use crate::traits::{ObjectAcl, ObjectStore, PutObject, PutReceipt, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::{ByteStream, DateTime as SmithyDateTime};
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use parcel_core::config::S3Config;

/// S3 storage implementation backed by the AWS SDK (SigV4 signing)
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    host: String,
    bucket: String,
}

impl S3Store {
    /// Create a new S3Store instance
    ///
    /// The client always uses path-style addressing against `config.host`, which
    /// is what MinIO, Ceph RGW and most other S3-compatible servers expect.
    pub fn new(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "parcel-static",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.host)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        S3Store {
            client: Client::from_conf(s3_config),
            host: config.host.clone(),
            bucket: config.bucket.clone(),
        }
    }
}

fn canned_acl(acl: ObjectAcl) -> ObjectCannedAcl {
    match acl {
        ObjectAcl::Private => ObjectCannedAcl::Private,
        ObjectAcl::PublicRead => ObjectCannedAcl::PublicRead,
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, request: PutObject) -> StorageResult<PutReceipt> {
        keys::validate_key(&request.key)?;

        let size = request.body.len() as u64;
        let start = std::time::Instant::now();

        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&request.key)
            .body(ByteStream::from(request.body))
            .acl(canned_acl(request.acl))
            .content_type(&request.content_type)
            .expires(SmithyDateTime::from_secs(request.expires.timestamp()))
            .send()
            .await;

        match result {
            Ok(output) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %request.key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload successful"
                );
                Ok(PutReceipt {
                    status: 200,
                    etag: output.e_tag().map(|tag| tag.trim_matches('"').to_string()),
                })
            }
            Err(e) => {
                let message = DisplayErrorContext(&e).to_string();
                tracing::error!(
                    error = %message,
                    bucket = %self.bucket,
                    key = %request.key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                match &e {
                    SdkError::ServiceError(service) => Err(StorageError::from_status(
                        service.raw().status().as_u16(),
                        e.code(),
                        message,
                    )),
                    _ => Err(StorageError::UploadFailed(message)),
                }
            }
        }
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
