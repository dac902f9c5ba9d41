//! Signed-URL issuer.
//!
//! Converts owner- or share-authenticated access into short-lived
//! download credentials. Issued URLs live out their own window: a share
//! deactivated after issuance does not revoke a URL already handed out.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use cove_auth::AccessGuard;
use cove_core::error::AppError;
use cove_core::result::AppResult;
use cove_core::traits::ObjectStore;
use cove_database::{DownloadLogStore, FileStore, ShareStore};
use cove_entity::audit::CreateDownloadLog;
use cove_entity::file::File;

use crate::context::RequestContext;
use crate::share::ShareAccessService;

/// Signed URL issued to a file's owner.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OwnerSignedUrl {
    /// The pre-authorized download URL.
    pub signed_url: String,
    /// Original filename.
    pub filename: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub content_type: String,
    /// When the URL stops working.
    pub expires_at: DateTime<Utc>,
}

/// Signed URL issued to a share-token holder.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ShareSignedUrl {
    /// The pre-authorized download URL.
    pub signed_url: String,
    /// Original filename.
    pub filename: String,
}

/// Issues short-lived signed download URLs with best-effort auditing.
#[derive(Clone)]
pub struct SignedUrlService {
    files: Arc<dyn FileStore>,
    shares: Arc<dyn ShareStore>,
    download_logs: Arc<dyn DownloadLogStore>,
    objects: Arc<dyn ObjectStore>,
    access: ShareAccessService,
    /// Lifetime of issued URLs.
    url_ttl: Duration,
    /// Bound on individual object-store calls.
    op_timeout: Duration,
}

impl SignedUrlService {
    /// Creates a new signed-URL service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        files: Arc<dyn FileStore>,
        shares: Arc<dyn ShareStore>,
        download_logs: Arc<dyn DownloadLogStore>,
        objects: Arc<dyn ObjectStore>,
        access: ShareAccessService,
        url_ttl: Duration,
        op_timeout: Duration,
    ) -> Self {
        Self {
            files,
            shares,
            download_logs,
            objects,
            access,
            url_ttl,
            op_timeout,
        }
    }

    /// Issue a signed URL for a file the caller owns.
    pub async fn issue_for_owner(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> AppResult<OwnerSignedUrl> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        AccessGuard::authorize_owner(file.owner_id, ctx.user_id, "File not found")?;

        let signed = self.presign(&file).await?;
        self.audit(ctx, file.id, Some(ctx.user_id)).await;

        info!(file_id = %file.id, user_id = %ctx.user_id, "Issued owner signed URL");
        Ok(OwnerSignedUrl {
            signed_url: signed.url,
            filename: file.filename,
            size_bytes: file.size_bytes,
            content_type: file.content_type,
            expires_at: signed.expires_at,
        })
    }

    /// Issue a signed URL for a share-token holder.
    ///
    /// The token must be active, unexpired, and grant download; when
    /// `file_path` is supplied it must match the shared file's object
    /// key. The share's download counter increments best-effort.
    pub async fn issue_for_share(
        &self,
        ctx: &RequestContext,
        token: &str,
        file_path: Option<&str>,
    ) -> AppResult<ShareSignedUrl> {
        let (share, file) = self.access.check_download_permission(token).await?;

        if let Some(path) = file_path
            && path != file.storage_path
        {
            return Err(AppError::not_found("File not found"));
        }

        let signed = self.presign(&file).await?;

        if let Err(e) = self.shares.increment_download_count(share.id).await {
            warn!(share_id = %share.id, error = %e, "Failed to bump download count");
        }
        self.audit(ctx, file.id, None).await;

        info!(share_id = %share.id, file_id = %file.id, "Issued share signed URL");
        Ok(ShareSignedUrl {
            signed_url: signed.url,
            filename: file.filename,
        })
    }

    async fn presign(&self, file: &File) -> AppResult<cove_core::traits::SignedDownload> {
        tokio::time::timeout(
            self.op_timeout,
            self.objects
                .presign_download(&file.storage_path, &file.filename, self.url_ttl),
        )
        .await
        .map_err(|_| AppError::service_unavailable("Object storage timed out"))?
    }

    /// Append a download audit entry. Failures are logged, never
    /// surfaced.
    async fn audit(&self, ctx: &RequestContext, file_id: Uuid, user_id: Option<Uuid>) {
        let entry = CreateDownloadLog {
            file_id,
            user_id,
            client_ip: Some(ctx.ip_address.clone()),
            user_agent: ctx.user_agent.clone(),
        };
        if let Err(e) = self.download_logs.append(entry).await {
            warn!(file_id = %file_id, error = %e, "Failed to append download log");
        }
    }
}
