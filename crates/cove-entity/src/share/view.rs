//! Public-safe projections returned to share-token holders.
//!
//! These deliberately omit owner ids and anything else a non-owner has no
//! business seeing. `SharedFile::storage_path` is included because it is
//! what a holder presents back when requesting a signed download URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{Share, SharePermission, ShareType};

/// Public projection of a share record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePublic {
    /// The bearer token.
    pub token: String,
    /// Type of share link.
    pub share_type: ShareType,
    /// Permission level granted.
    pub permissions: SharePermission,
    /// Validation count, including the validation that produced this view.
    pub view_count: i32,
    /// Signed-URL issuance count.
    pub download_count: i32,
    /// When the share expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

/// Public projection of a shared file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedFile {
    /// File ID.
    pub id: Uuid,
    /// File name.
    pub filename: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub content_type: String,
    /// Object key, presented back when requesting a signed URL.
    pub storage_path: String,
}

/// Public projection of a shared folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedFolder {
    /// Folder ID.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
}

/// What a holder of a valid token gets back from validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareView {
    /// The share's public fields.
    pub share: SharePublic,
    /// The shared file, when the share targets a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<SharedFile>,
    /// The shared folder, when the share targets a folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<SharedFolder>,
}

impl SharePublic {
    /// Build the public projection from a share row, with `view_count`
    /// reflecting the increment just applied by the validator.
    pub fn from_share(share: &Share, view_count: i32) -> Self {
        Self {
            token: share.token.clone(),
            share_type: share.share_type,
            permissions: share.permissions,
            view_count,
            download_count: share.download_count,
            expires_at: share.expires_at,
            created_at: share.created_at,
        }
    }
}
