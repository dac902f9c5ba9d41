//! Object store trait for pluggable storage backends.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::result::AppResult;

/// A time-boxed, pre-authorized download credential for one stored object.
///
/// Once issued, the URL remains valid for its own window regardless of any
/// later change to the share or entry that justified the issuance;
/// revocation is not real-time.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SignedDownload {
    /// The pre-authorized download URL.
    pub url: String,
    /// When the URL stops working.
    pub expires_at: DateTime<Utc>,
}

/// Trait for object storage backends.
///
/// Keys are opaque, owner-prefixed strings (`{owner_id}/{...}`); the prefix
/// doubles as the namespace isolation boundary at the storage layer. The
/// trait is defined here in `cove-core` and implemented in `cove-storage`
/// for the local filesystem, S3-compatible services, and an in-memory
/// provider used by tests.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read an object into memory as a complete byte vector.
    async fn read_bytes(&self, key: &str) -> AppResult<Bytes>;

    /// Write bytes to an object at the given key.
    async fn write(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Delete the object at the given key.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Copy an object from one key to another within this provider.
    async fn copy(&self, from: &str, to: &str) -> AppResult<()>;

    /// Check whether an object exists at the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Issue a pre-authorized download URL for the object at `key`,
    /// valid for `ttl`. `filename` is used for the Content-Disposition
    /// of the eventual download.
    async fn presign_download(
        &self,
        key: &str,
        filename: &str,
        ttl: Duration,
    ) -> AppResult<SignedDownload>;
}
