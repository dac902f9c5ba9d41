//! Cove Server — per-user file namespace with secure sharing.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use cove_core::config::AppConfig;
use cove_core::error::AppError;
use cove_database::DatabasePool;
use cove_database::repositories::{
    PgDownloadLogRepository, PgFileRepository, PgFolderRepository, PgShareRepository,
};
use cove_database::{DownloadLogStore, FileStore, FolderStore, ShareStore};
use cove_service::{NamespaceService, ShareAccessService, ShareService, SignedUrlService};

#[tokio::main]
async fn main() {
    let env = std::env::var("COVE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Cove v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    cove_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    tracing::info!(provider = %config.storage.provider, "Initializing object store...");
    let objects = cove_storage::build_object_store(&config.storage).await?;
    tracing::info!("Object store initialized");

    let folder_repo: Arc<dyn FolderStore> = Arc::new(PgFolderRepository::new(db.pool().clone()));
    let file_repo: Arc<dyn FileStore> = Arc::new(PgFileRepository::new(db.pool().clone()));
    let share_repo: Arc<dyn ShareStore> = Arc::new(PgShareRepository::new(db.pool().clone()));
    let download_log_repo: Arc<dyn DownloadLogStore> =
        Arc::new(PgDownloadLogRepository::new(db.pool().clone()));

    let guard = Arc::new(cove_auth::AccessGuard::new(cove_auth::JwtDecoder::new(
        &config.auth,
    )));

    let op_timeout = Duration::from_secs(config.storage.operation_timeout_seconds);
    let url_ttl = Duration::from_secs(config.storage.signed_url_ttl_seconds);

    let namespace_service = Arc::new(NamespaceService::new(
        Arc::clone(&folder_repo),
        Arc::clone(&file_repo),
        Arc::clone(&objects),
        config.storage.max_upload_size_bytes,
        op_timeout,
    ));
    let share_service = Arc::new(ShareService::new(
        Arc::clone(&share_repo),
        Arc::clone(&file_repo),
        Arc::clone(&folder_repo),
        config.server.public_base_url.clone(),
    ));
    let share_access_service = Arc::new(ShareAccessService::new(
        Arc::clone(&share_repo),
        Arc::clone(&file_repo),
        Arc::clone(&folder_repo),
    ));
    let signed_url_service = Arc::new(SignedUrlService::new(
        Arc::clone(&file_repo),
        Arc::clone(&share_repo),
        Arc::clone(&download_log_repo),
        Arc::clone(&objects),
        (*share_access_service).clone(),
        url_ttl,
        op_timeout,
    ));

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = cove_api::AppState {
        config: Arc::new(config),
        db: db.clone(),
        objects,
        guard,
        namespace_service,
        share_service,
        share_access_service,
        signed_url_service,
    };

    let app = cove_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Cove server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    db.close().await;
    tracing::info!("Cove server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
