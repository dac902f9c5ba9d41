//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use cove_entity::share::{SharePermission, ShareType};

/// Query parameters for entry listings.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryQuery {
    /// Folder to list; absent means the root level.
    pub folder_id: Option<Uuid>,
}

/// Create folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1-255 characters"))]
    pub name: String,
    /// Parent folder; absent means the root level.
    pub parent_id: Option<Uuid>,
}

/// Move folder request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFolderRequest {
    /// New parent; absent means the root level.
    pub target_folder_id: Option<Uuid>,
}

/// Move file request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFileRequest {
    /// Destination folder; absent means the root level.
    pub target_folder_id: Option<Uuid>,
}

/// Copy file request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyFileRequest {
    /// Destination folder; absent means the root level.
    pub target_folder_id: Option<Uuid>,
}

/// Create share request body. Exactly one of `file_id`/`folder_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareRequest {
    /// File to share.
    pub file_id: Option<Uuid>,
    /// Folder to share.
    pub folder_id: Option<Uuid>,
    /// Share visibility type.
    #[serde(default = "default_share_type")]
    pub share_type: ShareType,
    /// Granted permission.
    #[serde(default = "default_permissions")]
    pub permissions: SharePermission,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_share_type() -> ShareType {
    ShareType::Public
}

fn default_permissions() -> SharePermission {
    SharePermission::Download
}

/// Query parameters for redeeming a locally minted download URL.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadQuery {
    /// Signed download token from the issued URL.
    pub token: String,
}

/// Query parameters for owner signed-URL issuance.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedUrlQuery {
    /// File to issue a URL for.
    pub file_id: Uuid,
}

/// Dual-mode signed-URL request body: either `file_id` (owner mode,
/// requires a bearer token) or `share_token` + optional `file_path`
/// (share mode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrlRequest {
    /// File to issue a URL for (owner mode).
    pub file_id: Option<Uuid>,
    /// Share token authorizing the download (share mode).
    pub share_token: Option<String>,
    /// Object key the holder expects, echoed from the share view.
    pub file_path: Option<String>,
}
