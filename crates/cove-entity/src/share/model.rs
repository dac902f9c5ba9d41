//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Type of share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShareType {
    /// A link intended to be posted openly.
    Public,
    /// A link intended for direct recipients only. Behaves identically to
    /// `Public` at the access layer; clients use it as a display hint.
    Unlisted,
}

/// Permission level granted by a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_permission", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SharePermission {
    /// Holder may view the shared entry's metadata.
    View,
    /// Holder may also request signed download URLs.
    Download,
}

/// A share granting non-owner access to exactly one file or folder.
///
/// The token is the sole bearer credential: possession of a valid, active,
/// non-expired token is necessary and sufficient for the granted
/// permission. Exactly one of `file_id` / `folder_id` is set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Share {
    /// Unique share identifier.
    pub id: Uuid,
    /// User who created the share.
    pub owner_id: Uuid,
    /// Shared file (mutually exclusive with `folder_id`).
    pub file_id: Option<Uuid>,
    /// Shared folder (mutually exclusive with `file_id`).
    pub folder_id: Option<Uuid>,
    /// Opaque, unguessable bearer token.
    pub token: String,
    /// Type of share link.
    pub share_type: ShareType,
    /// Permission level granted.
    pub permissions: SharePermission,
    /// Whether the share is currently active. Deactivation is terminal;
    /// the row is never physically deleted so audit history survives.
    pub is_active: bool,
    /// Number of successful validations.
    pub view_count: i32,
    /// Number of signed-URL issuances through this share.
    pub download_count: i32,
    /// When the share expires (`None` = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

impl Share {
    /// Check whether the share is past its expiry time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= Utc::now(),
            None => false,
        }
    }

    /// Check whether the share grants download access.
    pub fn grants_download(&self) -> bool {
        self.permissions == SharePermission::Download
    }
}

/// Data required to create a new share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShare {
    /// User creating the share.
    pub owner_id: Uuid,
    /// Shared file (mutually exclusive with `folder_id`).
    pub file_id: Option<Uuid>,
    /// Shared folder (mutually exclusive with `file_id`).
    pub folder_id: Option<Uuid>,
    /// Bearer token.
    pub token: String,
    /// Type of share link.
    pub share_type: ShareType,
    /// Permission level.
    pub permissions: SharePermission,
    /// Expiry time (`None` = never).
    pub expires_at: Option<DateTime<Utc>>,
}
