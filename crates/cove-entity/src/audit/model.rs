//! Download log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A best-effort record of a signed-URL issuance.
///
/// Non-authoritative: a failed append never blocks or fails the download
/// that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DownloadLog {
    /// Unique log entry identifier.
    pub id: Uuid,
    /// The file that was downloaded.
    pub file_id: Uuid,
    /// The authenticated user, if the download was owner-initiated.
    pub user_id: Option<Uuid>,
    /// IP address of the requester.
    pub client_ip: Option<String>,
    /// User-Agent of the requester.
    pub user_agent: Option<String>,
    /// When the issuance happened.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a download log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDownloadLog {
    /// The file that was downloaded.
    pub file_id: Uuid,
    /// The authenticated user, if any.
    pub user_id: Option<Uuid>,
    /// Requester IP address.
    pub client_ip: Option<String>,
    /// Requester User-Agent.
    pub user_agent: Option<String>,
}
