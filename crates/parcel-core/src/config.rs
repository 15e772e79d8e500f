//! Configuration module
//!
//! Configuration is resolved once at startup and handed to the rest of the
//! service as an immutable value. Values come from, in increasing priority:
//! built-in defaults, an optional JSON file named by `APP_CONFIG_FILE`, and
//! process environment variables (a `.env` file is loaded first if present).
//!
//! Keys in the JSON file are the lowercase form of the environment variable
//! names, e.g. `{"s3_host": "http://minio:9000", "expire_days": 7}`.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    DEFAULT_EXPIRE_DAYS, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_PORT, DEFAULT_S3_REGION,
    DEFAULT_STORE_TIMEOUT_SECS,
};
use crate::storage_types::{CorrelationMode, SignatureVersion, StorageBackend};

const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const MAX_EXPIRE_DAYS: i64 = 36_500;

/// Startup configuration failures. These are fatal: the service refuses to start.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("Failed to load config file {path}")]
    File {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Object store connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct S3Config {
    /// Endpoint including scheme, without trailing slash (e.g. `http://minio:9000`).
    pub host: String,
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub signature_version: SignatureVersion,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("host", &self.host)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("signature_version", &self.signature_version)
            .finish()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
    pub storage_backend: StorageBackend,
    pub s3: S3Config,
    pub expire_days: i64,
    pub store_timeout_secs: u64,
    pub max_file_size_mb: usize,
    pub correlation_mode: CorrelationMode,
    pub docs_enabled: bool,
    pub log_format: String,
}

impl Config {
    /// Load configuration from `.env`, `APP_CONFIG_FILE` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = match env::var("APP_CONFIG_FILE") {
            Ok(path) if !path.trim().is_empty() => read_config_file(Path::new(path.trim()))?,
            _ => HashMap::new(),
        };

        Self::from_lookup(|var| {
            env::var(var)
                .ok()
                .or_else(|| file.get(&var.to_lowercase()).cloned())
        })
    }

    /// Build configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build configuration from a JSON file, ignoring the environment.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = read_config_file(path.as_ref())?;
        Self::from_lookup(|var| file.get(&var.to_lowercase()).cloned())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let host = get("S3_HOST").ok_or(ConfigError::Missing("S3_HOST"))?;
        let host = host.trim_end_matches('/').to_string();

        let s3 = S3Config {
            host,
            bucket: get("S3_BUCKET").ok_or(ConfigError::Missing("S3_BUCKET"))?,
            region: get("S3_REGION").unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
            access_key: get("ACCESS_KEY").unwrap_or_default(),
            secret_key: get("SECRET_KEY").unwrap_or_default(),
            signature_version: parse_or(
                "S3_SIGNATURE_VERSION",
                get("S3_SIGNATURE_VERSION"),
                SignatureVersion::default(),
            )?,
        };

        let config = Config {
            server_port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
            environment,
            cors_origins,
            http_concurrency_limit: parse_or(
                "HTTP_CONCURRENCY_LIMIT",
                get("HTTP_CONCURRENCY_LIMIT"),
                HTTP_CONCURRENCY_LIMIT,
            )?,
            storage_backend: parse_or(
                "STORAGE_BACKEND",
                get("STORAGE_BACKEND"),
                StorageBackend::S3,
            )?,
            s3,
            expire_days: parse_or("EXPIRE_DAYS", get("EXPIRE_DAYS"), DEFAULT_EXPIRE_DAYS)?,
            store_timeout_secs: parse_or(
                "STORE_TIMEOUT_SECS",
                get("STORE_TIMEOUT_SECS"),
                DEFAULT_STORE_TIMEOUT_SECS,
            )?,
            max_file_size_mb: parse_or(
                "MAX_FILE_SIZE_MB",
                get("MAX_FILE_SIZE_MB"),
                DEFAULT_MAX_FILE_SIZE_MB,
            )?,
            correlation_mode: parse_or(
                "CORRELATION_MODE",
                get("CORRELATION_MODE"),
                CorrelationMode::default(),
            )?,
            docs_enabled: parse_bool("DOCS_ENABLED", get("DOCS_ENABLED"), true)?,
            log_format: get("LOG_FORMAT")
                .map(|s| s.to_lowercase())
                .unwrap_or_else(|| "compact".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.s3.host.starts_with("http://") || self.s3.host.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "S3_HOST",
                reason: "must start with http:// or https://".to_string(),
            });
        }

        if self.s3.bucket.contains('/') {
            return Err(ConfigError::Invalid {
                var: "S3_BUCKET",
                reason: "must not contain '/'".to_string(),
            });
        }

        if self.storage_backend == StorageBackend::S3 {
            if self.s3.access_key.is_empty() {
                return Err(ConfigError::Missing("ACCESS_KEY"));
            }
            if self.s3.secret_key.is_empty() {
                return Err(ConfigError::Missing("SECRET_KEY"));
            }
        }

        if !(1..=MAX_EXPIRE_DAYS).contains(&self.expire_days) {
            return Err(ConfigError::Invalid {
                var: "EXPIRE_DAYS",
                reason: format!("must be between 1 and {}", MAX_EXPIRE_DAYS),
            });
        }

        if self.store_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "STORE_TIMEOUT_SECS",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.max_file_size_mb == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_FILE_SIZE_MB",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.http_concurrency_limit == 0 {
            return Err(ConfigError::Invalid {
                var: "HTTP_CONCURRENCY_LIMIT",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(ConfigError::Invalid {
                var: "CORS_ORIGINS",
                reason: "cannot be '*' in production".to_string(),
            });
        }

        // The memory store keeps every upload for the life of the process.
        if self.is_production() && self.storage_backend == StorageBackend::Memory {
            return Err(ConfigError::Invalid {
                var: "STORAGE_BACKEND",
                reason: "'memory' cannot be used in production".to_string(),
            });
        }

        if !matches!(self.log_format.as_str(), "compact" | "json") {
            return Err(ConfigError::Invalid {
                var: "LOG_FORMAT",
                reason: format!("expected 'compact' or 'json', got '{}'", self.log_format),
            });
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

fn parse_or<T>(var: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match value {
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
            var,
            reason: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}

fn parse_bool(var: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::to_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            var,
            reason: format!("'{}' is not a boolean", other),
        }),
    }
}

/// Read a flat JSON object into lowercase-key string values.
fn read_config_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let file_error = |source: anyhow::Error| ConfigError::File {
        path: path.display().to_string(),
        source,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| file_error(e.into()))?;
    let values: HashMap<String, serde_json::Value> =
        serde_json::from_str(&raw).map_err(|e| file_error(e.into()))?;

    Ok(values
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s,
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            };
            Some((key.to_lowercase(), value))
        })
        .collect())
}
