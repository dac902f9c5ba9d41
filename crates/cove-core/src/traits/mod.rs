//! Trait definitions shared across Cove crates.

pub mod object_store;

pub use object_store::{ObjectStore, SignedDownload};
