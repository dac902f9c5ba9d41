//! # cove-api
//!
//! HTTP API layer for Cove: axum routes, handlers, DTOs, middleware,
//! and the `AppError` → HTTP mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
