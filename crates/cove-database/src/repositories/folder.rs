//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use cove_core::error::{AppError, ErrorKind};
use cove_core::result::AppResult;
use cove_entity::folder::{CreateFolder, Folder};

use crate::store::{FolderStore, ReparentOutcome};

/// Hard cap on tree depth walked by the recursive queries.
const MAX_TREE_DEPTH: i32 = 128;

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct PgFolderRepository {
    pool: PgPool,
}

impl PgFolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for PgFolderRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn list_children(
        &self,
        owner_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders \
             WHERE owner_id = $1 AND parent_id IS NOT DISTINCT FROM $2 \
             ORDER BY name ASC",
        )
        .bind(owner_id)
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn ancestors(&self, id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "WITH RECURSIVE chain AS ( \
                 SELECT f.*, 0 AS depth FROM folders f WHERE f.id = $1 \
                 UNION ALL \
                 SELECT f.*, c.depth + 1 FROM folders f \
                 JOIN chain c ON f.id = c.parent_id \
                 WHERE c.depth < $2 \
             ) \
             SELECT id, owner_id, parent_id, name, created_at FROM chain ORDER BY depth ASC",
        )
        .bind(id)
        .bind(MAX_TREE_DEPTH)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to resolve folder ancestors", e)
        })
    }

    async fn descendants(&self, id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "WITH RECURSIVE subtree AS ( \
                 SELECT f.*, 0 AS depth FROM folders f WHERE f.id = $1 \
                 UNION ALL \
                 SELECT f.*, s.depth + 1 FROM folders f \
                 JOIN subtree s ON f.parent_id = s.id \
                 WHERE s.depth < $2 \
             ) \
             SELECT id, owner_id, parent_id, name, created_at FROM subtree \
             WHERE id <> $1 ORDER BY depth ASC, name ASC",
        )
        .bind(id)
        .bind(MAX_TREE_DEPTH)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to resolve folder subtree", e)
        })
    }

    async fn create(&self, input: CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (owner_id, parent_id, name) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(input.owner_id)
        .bind(input.parent_id)
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))
    }

    async fn reparent(
        &self,
        id: Uuid,
        owner_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<ReparentOutcome> {
        // The cycle guard runs inside the UPDATE itself: the destination's
        // ancestor chain is walked within the same statement, so a
        // concurrent move cannot invalidate the check before the write.
        let moved = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $3 \
             WHERE id = $1 AND owner_id = $2 \
               AND ($3 IS NULL OR ( \
                   $3 <> $1 \
                   AND EXISTS (SELECT 1 FROM folders WHERE id = $3 AND owner_id = $2) \
                   AND NOT EXISTS ( \
                       WITH RECURSIVE chain AS ( \
                           SELECT f.id, f.parent_id FROM folders f WHERE f.id = $3 \
                           UNION ALL \
                           SELECT f.id, f.parent_id FROM folders f \
                           JOIN chain c ON f.id = c.parent_id \
                       ) \
                       SELECT 1 FROM chain WHERE chain.id = $1 \
                   ) \
               )) \
             RETURNING *",
        )
        .bind(id)
        .bind(owner_id)
        .bind(new_parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move folder", e))?;

        if let Some(folder) = moved {
            return Ok(ReparentOutcome::Moved(folder));
        }

        // Zero rows means either the folder/destination is missing for
        // this owner, or the guard refused the move. Disambiguate.
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM folders WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to inspect folder", e)
                })?;

        if exists.is_none() {
            return Ok(ReparentOutcome::Missing);
        }

        if let Some(dest) = new_parent_id {
            let dest_exists: Option<i64> =
                sqlx::query_scalar("SELECT 1 FROM folders WHERE id = $1 AND owner_id = $2")
                    .bind(dest)
                    .bind(owner_id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to inspect folder", e)
                    })?;
            if dest_exists.is_none() {
                return Ok(ReparentOutcome::Missing);
            }
        }

        Ok(ReparentOutcome::CycleBlocked)
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete folder", e))?;
        Ok(result.rows_affected() > 0)
    }
}
