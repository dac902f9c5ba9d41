//! # cove-core
//!
//! Core crate for Cove. Contains the unified error system, configuration
//! schemas, and the object-store trait that the storage providers implement.
//!
//! This crate has **no** internal dependencies on other Cove crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
