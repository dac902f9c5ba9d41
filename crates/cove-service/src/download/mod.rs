//! Signed download URL issuance.

pub mod service;

pub use service::{OwnerSignedUrl, ShareSignedUrl, SignedUrlService};
