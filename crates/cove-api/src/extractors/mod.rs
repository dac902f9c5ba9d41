//! Custom axum extractors.

pub mod auth;

pub use auth::{AuthUser, client_info};
