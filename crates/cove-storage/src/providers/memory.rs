//! In-memory object store used by tests and local development.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;

use cove_core::error::AppError;
use cove_core::result::AppResult;
use cove_core::traits::{ObjectStore, SignedDownload};

/// In-memory object store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: DashMap<String, Bytes>,
}

impl MemoryObjectStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        self.objects
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Object not found: {key}")))
    }

    async fn write(&self, key: &str, data: Bytes) -> AppResult<()> {
        self.objects.insert(key.to_string(), data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.objects.remove(key);
        Ok(())
    }

    async fn copy(&self, from: &str, to: &str) -> AppResult<()> {
        let data = self.read_bytes(from).await?;
        self.objects.insert(to.to_string(), data);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(key))
    }

    async fn presign_download(
        &self,
        key: &str,
        filename: &str,
        ttl: Duration,
    ) -> AppResult<SignedDownload> {
        if !self.objects.contains_key(key) {
            return Err(AppError::not_found(format!("Object not found: {key}")));
        }
        Ok(SignedDownload {
            url: format!("memory://{key}?filename={filename}"),
            expires_at: Utc::now() + chrono::Duration::seconds(ttl.as_secs() as i64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copy_then_delete_source() {
        let store = MemoryObjectStore::new();
        store.write("u1/a", Bytes::from_static(b"abc")).await.unwrap();
        store.copy("u1/a", "u2/b").await.unwrap();
        store.delete("u1/a").await.unwrap();

        assert!(!store.exists("u1/a").await.unwrap());
        assert_eq!(&store.read_bytes("u2/b").await.unwrap()[..], b"abc");
    }

    #[tokio::test]
    async fn test_presign_requires_existing_object() {
        let store = MemoryObjectStore::new();
        assert!(
            store
                .presign_download("u1/missing", "x", Duration::from_secs(60))
                .await
                .is_err()
        );
    }
}
