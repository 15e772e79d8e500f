use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Storage backend types
///
/// `S3` talks to a real S3-compatible endpoint; `Memory` keeps objects in the
/// process and is meant for local development and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Request signing scheme used against the S3 endpoint.
///
/// `Legacy` is the original `s3` scheme (HMAC-SHA1 over a canonical string) that
/// many third-party S3-compatible servers still require. `V4` is AWS SigV4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignatureVersion {
    #[default]
    #[serde(rename = "s3")]
    Legacy,
    #[serde(rename = "s3v4")]
    V4,
}

impl FromStr for SignatureVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" | "v2" => Ok(SignatureVersion::Legacy),
            "s3v4" | "v4" => Ok(SignatureVersion::V4),
            _ => Err(anyhow::anyhow!("Invalid signature version: {}", s)),
        }
    }
}

impl Display for SignatureVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SignatureVersion::Legacy => write!(f, "s3"),
            SignatureVersion::V4 => write!(f, "s3v4"),
        }
    }
}

/// Where the echoed `X-User-Id` / `X-Channel-Id` values go in an upload response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMode {
    /// Echo as response headers.
    #[default]
    Headers,
    /// Embed under a `headers` object in the JSON body.
    Body,
}

impl FromStr for CorrelationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "headers" | "header" => Ok(CorrelationMode::Headers),
            "body" => Ok(CorrelationMode::Body),
            _ => Err(anyhow::anyhow!("Invalid correlation mode: {}", s)),
        }
    }
}

impl Display for CorrelationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CorrelationMode::Headers => write!(f, "headers"),
            CorrelationMode::Body => write!(f, "body"),
        }
    }
}
