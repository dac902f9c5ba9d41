//! Namespace tree management: folders, files, uploads.

pub mod service;

pub use service::{EntryListing, NamespaceService};
