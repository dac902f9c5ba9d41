//! # cove-storage
//!
//! Object storage providers for Cove. The [`cove_core::traits::ObjectStore`]
//! trait is implemented for a local filesystem backend, an S3-compatible
//! backend, and an in-memory backend used in tests.

pub mod providers;

pub use providers::build_object_store;
pub use providers::local::{DownloadClaims, LocalObjectStore, decode_download_token};
pub use providers::memory::MemoryObjectStore;
pub use providers::s3::S3ObjectStore;
