//! Share repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use cove_core::error::{AppError, ErrorKind};
use cove_core::result::AppResult;
use cove_entity::share::{CreateShare, Share};

use crate::store::ShareStore;

/// Repository for share links and their counters.
#[derive(Debug, Clone)]
pub struct PgShareRepository {
    pool: PgPool,
}

impl PgShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for PgShareRepository {
    async fn create(&self, input: CreateShare) -> AppResult<Share> {
        sqlx::query_as::<_, Share>(
            "INSERT INTO shares (owner_id, file_id, folder_id, token, share_type, permissions, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(input.owner_id)
        .bind(input.file_id)
        .bind(input.folder_id)
        .bind(&input.token)
        .bind(input.share_type)
        .bind(input.permissions)
        .bind(input.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("shares_token_key") =>
            {
                AppError::conflict("Share token collision")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create share", e),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>("SELECT * FROM shares WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>("SELECT * FROM shares WHERE token = $1 AND is_active = TRUE")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find share by token", e)
            })
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<Share>> {
        sqlx::query_as::<_, Share>(
            "SELECT * FROM shares WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shares", e))
    }

    async fn increment_view_count(&self, id: Uuid) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE shares SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to bump view count", e))?
        .ok_or_else(|| AppError::not_found("Share not found"))
    }

    async fn increment_download_count(&self, id: Uuid) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE shares SET download_count = download_count + 1 \
             WHERE id = $1 RETURNING download_count",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to bump download count", e)
        })?
        .ok_or_else(|| AppError::not_found("Share not found"))
    }

    async fn deactivate(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE shares SET is_active = FALSE WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to deactivate share", e)
                })?;
        Ok(result.rows_affected() > 0)
    }
}
