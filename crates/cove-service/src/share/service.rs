//! Share lifecycle service: creation, listing, revocation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use cove_auth::AccessGuard;
use cove_core::error::{AppError, ErrorKind};
use cove_core::result::AppResult;
use cove_database::{FileStore, FolderStore, ShareStore};
use cove_entity::share::{CreateShare, Share, SharePermission, ShareType};

use super::token::TokenGenerator;
use crate::context::RequestContext;

/// Attempts at minting a non-colliding token before giving up. With
/// 256-bit tokens a retry should never fire; the loop exists so a
/// astronomically unlikely unique-constraint hit is not a user-visible
/// error.
const TOKEN_RETRY_LIMIT: usize = 3;

/// Request to create a new share. Exactly one of `file_id`/`folder_id`
/// must be set.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateShareRequest {
    /// File being shared.
    pub file_id: Option<Uuid>,
    /// Folder being shared.
    pub folder_id: Option<Uuid>,
    /// Share visibility type.
    pub share_type: ShareType,
    /// What the share grants.
    pub permissions: SharePermission,
    /// Optional expiry; `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A share together with its public URL.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ShareWithUrl {
    /// The share record.
    pub share: Share,
    /// Public URL resolving to this share.
    pub url: String,
}

/// Manages share creation, listing, and revocation.
#[derive(Clone)]
pub struct ShareService {
    shares: Arc<dyn ShareStore>,
    files: Arc<dyn FileStore>,
    folders: Arc<dyn FolderStore>,
    tokens: TokenGenerator,
    /// Base URL for building public share links (no trailing slash).
    public_base_url: String,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        files: Arc<dyn FileStore>,
        folders: Arc<dyn FolderStore>,
        public_base_url: String,
    ) -> Self {
        Self {
            shares,
            files,
            folders,
            tokens: TokenGenerator::new(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a new share for a file or folder the caller owns.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        req: CreateShareRequest,
    ) -> AppResult<ShareWithUrl> {
        match (req.file_id, req.folder_id) {
            (Some(_), Some(_)) => {
                return Err(AppError::validation(
                    "A share targets either a file or a folder, not both",
                ));
            }
            (None, None) => {
                return Err(AppError::validation(
                    "A share must target a file or a folder",
                ));
            }
            _ => {}
        }

        if let Some(file_id) = req.file_id {
            let file = self
                .files
                .find_by_id(file_id)
                .await?
                .ok_or_else(|| AppError::not_found("File not found"))?;
            AccessGuard::authorize_owner(file.owner_id, ctx.user_id, "File not found")?;
        }
        if let Some(folder_id) = req.folder_id {
            let folder = self
                .folders
                .find_by_id(folder_id)
                .await?
                .ok_or_else(|| AppError::not_found("Folder not found"))?;
            AccessGuard::authorize_owner(folder.owner_id, ctx.user_id, "Folder not found")?;
        }

        let mut last_err = None;
        for _ in 0..TOKEN_RETRY_LIMIT {
            let token = self.tokens.generate();
            match self
                .shares
                .create(CreateShare {
                    owner_id: ctx.user_id,
                    file_id: req.file_id,
                    folder_id: req.folder_id,
                    token,
                    share_type: req.share_type,
                    permissions: req.permissions,
                    expires_at: req.expires_at,
                })
                .await
            {
                Ok(share) => {
                    info!(
                        share_id = %share.id,
                        user_id = %ctx.user_id,
                        share_type = ?share.share_type,
                        "Created share"
                    );
                    let url = self.share_url(&share.token);
                    return Ok(ShareWithUrl { share, url });
                }
                Err(e) if e.kind == ErrorKind::Conflict => last_err = Some(e),
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| AppError::internal("Failed to mint a share token")))
    }

    /// Lists the caller's shares, newest first.
    pub async fn list_shares(&self, ctx: &RequestContext) -> AppResult<Vec<ShareWithUrl>> {
        let shares = self.shares.list_for_owner(ctx.user_id).await?;
        Ok(shares
            .into_iter()
            .map(|share| {
                let url = self.share_url(&share.token);
                ShareWithUrl { share, url }
            })
            .collect())
    }

    /// Deactivates a share the caller owns. Already-inactive shares
    /// deactivate again without complaint.
    pub async fn deactivate_share(&self, ctx: &RequestContext, share_id: Uuid) -> AppResult<()> {
        if !self.shares.deactivate(share_id, ctx.user_id).await? {
            return Err(AppError::not_found("Share not found"));
        }
        info!(share_id = %share_id, user_id = %ctx.user_id, "Deactivated share");
        Ok(())
    }

    /// Public URL for a share token.
    pub fn share_url(&self, token: &str) -> String {
        format!("{}/share/{token}", self.public_base_url)
    }
}
