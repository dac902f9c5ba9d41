//! Namespace tree service.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::{info, warn};
use uuid::Uuid;

use cove_auth::AccessGuard;
use cove_core::error::AppError;
use cove_core::result::AppResult;
use cove_core::traits::ObjectStore;
use cove_database::{FileStore, FolderStore, ReparentOutcome};
use cove_entity::file::{CreateFile, File};
use cove_entity::folder::{Breadcrumb, CreateFolder, Folder};

use crate::context::RequestContext;

/// Folders and files directly inside one folder (or the root level).
#[derive(Debug, Clone, serde::Serialize)]
pub struct EntryListing {
    /// Child folders, sorted by name.
    pub folders: Vec<Folder>,
    /// Files in this folder, sorted by filename.
    pub files: Vec<File>,
}

/// Manages the per-user folder/file tree and its backing objects.
#[derive(Clone)]
pub struct NamespaceService {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    objects: Arc<dyn ObjectStore>,
    /// Maximum accepted upload size.
    max_upload_size_bytes: u64,
    /// Bound on individual object-store calls.
    op_timeout: Duration,
}

impl NamespaceService {
    /// Creates a new namespace service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        objects: Arc<dyn ObjectStore>,
        max_upload_size_bytes: u64,
        op_timeout: Duration,
    ) -> Self {
        Self {
            folders,
            files,
            objects,
            max_upload_size_bytes,
            op_timeout,
        }
    }

    /// List the folders and files directly under `folder_id` (root level
    /// when `None`).
    pub async fn list_entries(
        &self,
        ctx: &RequestContext,
        folder_id: Option<Uuid>,
    ) -> AppResult<EntryListing> {
        if let Some(id) = folder_id {
            self.require_folder(ctx, id).await?;
        }

        let folders = self.folders.list_children(ctx.user_id, folder_id).await?;
        let files = self.files.list_in_folder(ctx.user_id, folder_id).await?;
        Ok(EntryListing { folders, files })
    }

    /// Resolve the breadcrumb trail for a folder, root first.
    pub async fn breadcrumbs(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<Vec<Breadcrumb>> {
        self.require_folder(ctx, folder_id).await?;

        let mut chain = self.folders.ancestors(folder_id).await?;
        chain.reverse();
        Ok(chain
            .into_iter()
            .map(|f| Breadcrumb {
                id: f.id,
                name: f.name,
            })
            .collect())
    }

    /// Create a folder under `parent_id` (root level when `None`).
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: String,
        parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Folder name must not be empty"));
        }

        if let Some(parent) = parent_id {
            self.require_folder(ctx, parent).await?;
        }

        let folder = self
            .folders
            .create(CreateFolder {
                owner_id: ctx.user_id,
                parent_id,
                name,
            })
            .await?;

        info!(folder_id = %folder.id, user_id = %ctx.user_id, "Created folder");
        Ok(folder)
    }

    /// Delete a folder and everything beneath it.
    ///
    /// Backing objects are removed first, log-and-continue on failure;
    /// the metadata cascade always proceeds so the tree never gets stuck
    /// behind a flaky object store.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<()> {
        self.require_folder(ctx, folder_id).await?;

        let mut subtree = vec![folder_id];
        subtree.extend(
            self.folders
                .descendants(folder_id)
                .await?
                .into_iter()
                .map(|f| f.id),
        );

        for id in &subtree {
            let files = self.files.list_in_folder(ctx.user_id, Some(*id)).await?;
            for file in files {
                if let Err(e) = self.objects.delete(&file.storage_path).await {
                    warn!(
                        file_id = %file.id,
                        storage_path = %file.storage_path,
                        error = %e,
                        "Failed to delete backing object; continuing"
                    );
                }
            }
        }

        if !self.folders.delete(folder_id, ctx.user_id).await? {
            return Err(AppError::not_found("Folder not found"));
        }

        info!(folder_id = %folder_id, user_id = %ctx.user_id, "Deleted folder subtree");
        Ok(())
    }

    /// Delete a single file and its backing object.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<()> {
        let file = self.require_file(ctx, file_id).await?;

        self.bounded(self.objects.delete(&file.storage_path)).await?;

        if !self.files.delete(file_id, ctx.user_id).await? {
            return Err(AppError::not_found("File not found"));
        }

        info!(file_id = %file_id, user_id = %ctx.user_id, "Deleted file");
        Ok(())
    }

    /// Move a file into another folder (root level when `None`).
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        target_folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        if let Some(target) = target_folder_id {
            self.require_folder(ctx, target).await?;
        }

        self.files
            .set_folder(file_id, ctx.user_id, target_folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Move a folder under a new parent (root level when `None`).
    ///
    /// Moves that would make the folder its own ancestor are rejected
    /// with a conflict; the check is re-validated at commit time inside
    /// the store, so concurrent moves cannot sneak a cycle in.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        target_folder_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        if target_folder_id == Some(folder_id) {
            return Err(AppError::conflict("Cannot move a folder into itself"));
        }

        match self
            .folders
            .reparent(folder_id, ctx.user_id, target_folder_id)
            .await?
        {
            ReparentOutcome::Moved(folder) => {
                info!(folder_id = %folder.id, user_id = %ctx.user_id, "Moved folder");
                Ok(folder)
            }
            ReparentOutcome::CycleBlocked => Err(AppError::conflict(
                "Cannot move a folder into its own subtree",
            )),
            ReparentOutcome::Missing => Err(AppError::not_found("Folder not found")),
        }
    }

    /// Copy a file into a target folder, leaving the source untouched.
    pub async fn copy_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        target_folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        let source = self.require_file(ctx, file_id).await?;
        if let Some(target) = target_folder_id {
            self.require_folder(ctx, target).await?;
        }

        let new_key = derive_storage_key(ctx.user_id, &source.filename);
        self.bounded(self.objects.copy(&source.storage_path, &new_key))
            .await?;

        let created = self
            .files
            .create(CreateFile {
                owner_id: ctx.user_id,
                folder_id: target_folder_id,
                storage_path: new_key.clone(),
                filename: source.filename.clone(),
                size_bytes: source.size_bytes,
                content_type: source.content_type.clone(),
            })
            .await;

        match created {
            Ok(file) => {
                info!(
                    source_id = %file_id,
                    copy_id = %file.id,
                    user_id = %ctx.user_id,
                    "Copied file"
                );
                Ok(file)
            }
            Err(e) => {
                // Don't leave an unreachable object behind.
                if let Err(cleanup) = self.objects.delete(&new_key).await {
                    warn!(key = %new_key, error = %cleanup, "Failed to clean up copied object");
                }
                Err(e)
            }
        }
    }

    /// Store an uploaded file: object write first, metadata insert
    /// second. A metadata failure removes the orphaned object
    /// best-effort and surfaces a partial-failure error.
    pub async fn upload_file(
        &self,
        ctx: &RequestContext,
        filename: String,
        content_type: String,
        data: Bytes,
        folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        if data.len() as u64 > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "Upload exceeds the maximum size of {} bytes",
                self.max_upload_size_bytes
            )));
        }
        if filename.is_empty() {
            return Err(AppError::validation("Filename must not be empty"));
        }
        if let Some(folder) = folder_id {
            self.require_folder(ctx, folder).await?;
        }

        let key = derive_storage_key(ctx.user_id, &filename);
        let size_bytes = data.len() as i64;
        self.bounded(self.objects.write(&key, data)).await?;

        let created = self
            .files
            .create(CreateFile {
                owner_id: ctx.user_id,
                folder_id,
                storage_path: key.clone(),
                filename: filename.clone(),
                size_bytes,
                content_type,
            })
            .await;

        match created {
            Ok(file) => {
                info!(
                    file_id = %file.id,
                    user_id = %ctx.user_id,
                    size_bytes,
                    "Uploaded file"
                );
                Ok(file)
            }
            Err(e) => {
                if let Err(cleanup) = self.objects.delete(&key).await {
                    warn!(key = %key, error = %cleanup, "Failed to clean up orphaned upload");
                }
                Err(AppError::internal(format!(
                    "Upload partially failed: the object was stored but its metadata could not be saved ({e})"
                )))
            }
        }
    }

    /// Load a folder and require ownership through the access guard.
    async fn require_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<Folder> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        AccessGuard::authorize_owner(folder.owner_id, ctx.user_id, "Folder not found")?;
        Ok(folder)
    }

    /// Load a file and require ownership through the access guard.
    async fn require_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<File> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        AccessGuard::authorize_owner(file.owner_id, ctx.user_id, "File not found")?;
        Ok(file)
    }

    /// Run an object-store call under the configured timeout.
    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| AppError::service_unavailable("Object storage timed out"))?
    }
}

/// Derive a fresh, collision-resistant storage key for an owner's file.
pub fn derive_storage_key(owner_id: Uuid, filename: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!(
        "{owner_id}/{}-{suffix}-{filename}",
        Utc::now().timestamp_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_keys_are_owner_prefixed_and_unique() {
        let owner = Uuid::new_v4();
        let a = derive_storage_key(owner, "report.pdf");
        let b = derive_storage_key(owner, "report.pdf");

        assert!(a.starts_with(&format!("{owner}/")));
        assert!(a.ends_with("-report.pdf"));
        assert_ne!(a, b);
    }
}
