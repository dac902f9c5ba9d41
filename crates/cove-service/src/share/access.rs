//! Public share resolution: what a token holder may see and do.

use std::sync::Arc;

use tracing::info;

use cove_core::error::AppError;
use cove_core::result::AppResult;
use cove_database::{FileStore, FolderStore, ShareStore};
use cove_entity::file::File;
use cove_entity::share::{Share, SharePublic, ShareView, SharedFile, SharedFolder};

/// Validates share tokens and resolves them to their public view.
///
/// Unknown and deactivated tokens are indistinguishable to callers
/// (both read as not-found); expired shares answer distinctly so a
/// holder knows the link used to work.
#[derive(Clone)]
pub struct ShareAccessService {
    shares: Arc<dyn ShareStore>,
    files: Arc<dyn FileStore>,
    folders: Arc<dyn FolderStore>,
}

impl ShareAccessService {
    /// Creates a new share access service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        files: Arc<dyn FileStore>,
        folders: Arc<dyn FolderStore>,
    ) -> Self {
        Self {
            shares,
            files,
            folders,
        }
    }

    /// Validate a token and return the share's public view.
    ///
    /// The view counter increments only after the active and expiry
    /// checks pass; probing an expired link never inflates its count.
    pub async fn validate(&self, token: &str) -> AppResult<ShareView> {
        let share = self.find_active(token).await?;
        self.require_not_expired(&share)?;

        let view_count = self.shares.increment_view_count(share.id).await?;

        let mut view = ShareView {
            share: SharePublic::from_share(&share, view_count),
            file: None,
            folder: None,
        };

        if let Some(file_id) = share.file_id {
            let file = self
                .files
                .find_by_id(file_id)
                .await?
                .ok_or_else(|| AppError::not_found("Shared file no longer exists"))?;
            view.file = Some(SharedFile {
                id: file.id,
                filename: file.filename,
                size_bytes: file.size_bytes,
                content_type: file.content_type,
                storage_path: file.storage_path,
            });
        } else if let Some(folder_id) = share.folder_id {
            let folder = self
                .folders
                .find_by_id(folder_id)
                .await?
                .ok_or_else(|| AppError::not_found("Shared folder no longer exists"))?;
            view.folder = Some(SharedFolder {
                id: folder.id,
                name: folder.name,
            });
        }

        info!(share_id = %share.id, view_count, "Validated share token");
        Ok(view)
    }

    /// Check that a token authorizes downloading, returning the share
    /// and its target file.
    pub async fn check_download_permission(&self, token: &str) -> AppResult<(Share, File)> {
        let share = self.find_active(token).await?;
        self.require_not_expired(&share)?;

        if !share.grants_download() {
            return Err(AppError::authorization(
                "This share does not permit downloads",
            ));
        }

        let file_id = share.file_id.ok_or_else(|| {
            AppError::validation("Only file shares can issue download URLs")
        })?;
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shared file no longer exists"))?;

        Ok((share, file))
    }

    async fn find_active(&self, token: &str) -> AppResult<Share> {
        self.shares
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))
    }

    fn require_not_expired(&self, share: &Share) -> AppResult<()> {
        if share.is_expired() {
            Err(AppError::expired("This share link has expired"))
        } else {
            Ok(())
        }
    }
}
