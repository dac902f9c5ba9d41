//! # cove-entity
//!
//! Domain entity models for Cove: the owner-scoped namespace entries
//! (folders and files), shares, and the download audit log.

pub mod audit;
pub mod file;
pub mod folder;
pub mod share;
