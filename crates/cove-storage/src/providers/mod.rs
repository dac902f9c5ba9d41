//! Storage provider implementations.

pub mod local;
pub mod memory;
pub mod s3;

use std::sync::Arc;

use cove_core::config::StorageConfig;
use cove_core::error::AppError;
use cove_core::result::AppResult;
use cove_core::traits::ObjectStore;

use local::LocalObjectStore;
use memory::MemoryObjectStore;
use s3::S3ObjectStore;

/// Build the object store named by the storage configuration.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    match config.provider.as_str() {
        "local" => {
            let store = LocalObjectStore::new(&config.local).await?;
            Ok(Arc::new(store))
        }
        "s3" => {
            let store = S3ObjectStore::new(&config.s3).await?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryObjectStore::new())),
        other => Err(AppError::configuration(format!(
            "Unknown storage provider: {other}"
        ))),
    }
}
