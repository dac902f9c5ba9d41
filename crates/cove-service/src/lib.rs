//! # cove-service
//!
//! Business logic service layer for Cove. Each service orchestrates
//! entry stores, the object store, and configuration to implement
//! application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references, with persistence behind
//! the `cove-database` store traits.

pub mod context;
pub mod download;
pub mod namespace;
pub mod share;

pub use context::RequestContext;
pub use download::SignedUrlService;
pub use namespace::NamespaceService;
pub use share::{ShareAccessService, ShareService, TokenGenerator};
