//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file stored in Cove.
///
/// One `File` row corresponds to exactly one stored object for the lifetime
/// of the row; `storage_path` is the opaque key in the object store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The file owner.
    pub owner_id: Uuid,
    /// The folder containing this file (`None` for root-level).
    pub folder_id: Option<Uuid>,
    /// The object key in the external object store.
    pub storage_path: String,
    /// The file name (including extension).
    pub filename: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// MIME type of the file.
    pub content_type: String,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
}

impl File {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.filename)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file owner.
    pub owner_id: Uuid,
    /// The folder to place the file in (`None` for root-level).
    pub folder_id: Option<Uuid>,
    /// The object key in the external object store.
    pub storage_path: String,
    /// The file name.
    pub filename: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub content_type: String,
}
