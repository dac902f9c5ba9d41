//! HTTP request handlers.

pub mod download;
pub mod file;
pub mod folder;
pub mod health;
pub mod share;
pub mod signed_url;
