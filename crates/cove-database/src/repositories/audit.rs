//! Download audit log repository.

use async_trait::async_trait;
use sqlx::PgPool;

use cove_core::error::{AppError, ErrorKind};
use cove_core::result::AppResult;
use cove_entity::audit::CreateDownloadLog;

use crate::store::DownloadLogStore;

/// Repository for download audit entries.
#[derive(Debug, Clone)]
pub struct PgDownloadLogRepository {
    pool: PgPool,
}

impl PgDownloadLogRepository {
    /// Create a new download log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DownloadLogStore for PgDownloadLogRepository {
    async fn append(&self, input: CreateDownloadLog) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO download_logs (file_id, user_id, client_ip, user_agent) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(input.file_id)
        .bind(input.user_id)
        .bind(&input.client_ip)
        .bind(&input.user_agent)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to append download log", e)
        })?;
        Ok(())
    }
}
