//! Route definitions for the Cove HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to every handler via axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(entry_routes())
        .merge(share_routes())
        .merge(signed_url_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .nest("/api", api_routes)
        .route("/download", get(handlers::download::redeem))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Namespace endpoints: entry listing, folders, files.
fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(handlers::folder::list_entries))
        .route("/folders", post(handlers::folder::create_folder))
        .route(
            "/folders/{id}/breadcrumbs",
            get(handlers::folder::breadcrumbs),
        )
        .route("/folders/{id}", delete(handlers::folder::delete_folder))
        .route("/folders/{id}/move", put(handlers::folder::move_folder))
        .route("/files", post(handlers::file::upload_file))
        .route("/files/{id}", delete(handlers::file::delete_file))
        .route("/files/{id}/move", put(handlers::file::move_file))
        .route("/files/{id}/copy", post(handlers::file::copy_file))
}

/// Share endpoints, including the public token validation route.
fn share_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shares",
            post(handlers::share::create_share).get(handlers::share::list_shares),
        )
        .route(
            "/shares/{token}",
            get(handlers::share::validate_share).delete(handlers::share::deactivate_share),
        )
}

/// Signed-URL endpoints.
fn signed_url_routes() -> Router<AppState> {
    Router::new().route(
        "/signed-url",
        get(handlers::signed_url::issue_for_owner).post(handlers::signed_url::issue),
    )
}

/// Health endpoint.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
