//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use cove_auth::AccessGuard;
use cove_core::config::AppConfig;
use cove_core::traits::ObjectStore;
use cove_database::DatabasePool;
use cove_service::{NamespaceService, ShareAccessService, ShareService, SignedUrlService};

/// Application state containing all shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped (or cheaply cloneable) so the state
/// clones freely across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db: DatabasePool,
    /// Object storage backend.
    pub objects: Arc<dyn ObjectStore>,
    /// Bearer-token guard.
    pub guard: Arc<AccessGuard>,
    /// Namespace tree service.
    pub namespace_service: Arc<NamespaceService>,
    /// Share lifecycle service.
    pub share_service: Arc<ShareService>,
    /// Public share validation service.
    pub share_access_service: Arc<ShareAccessService>,
    /// Signed-URL issuer.
    pub signed_url_service: Arc<SignedUrlService>,
}
