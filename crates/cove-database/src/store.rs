//! Persistence traits consumed by the service layer.
//!
//! Services depend on these traits rather than on concrete sqlx
//! repositories so they can be exercised against in-memory fakes.

use async_trait::async_trait;
use uuid::Uuid;

use cove_core::result::AppResult;
use cove_entity::audit::CreateDownloadLog;
use cove_entity::file::{CreateFile, File};
use cove_entity::folder::{CreateFolder, Folder};
use cove_entity::share::{CreateShare, Share};

/// Result of attempting to re-parent a folder.
///
/// Re-parenting is guarded at the statement level so a concurrent move
/// cannot slip a cycle past a check-then-act window.
#[derive(Debug, Clone)]
pub enum ReparentOutcome {
    /// The folder was moved; the updated row is returned.
    Moved(Folder),
    /// The move would have made the folder its own ancestor.
    CycleBlocked,
    /// The folder (or the destination) does not exist for this owner.
    Missing,
}

/// Folder persistence operations.
#[async_trait]
pub trait FolderStore: Send + Sync + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// List the direct children of `parent_id` (root level when `None`)
    /// owned by `owner_id`, ordered by name.
    async fn list_children(&self, owner_id: Uuid, parent_id: Option<Uuid>)
    -> AppResult<Vec<Folder>>;

    /// Walk the parent chain starting at `id`, self first, root last.
    async fn ancestors(&self, id: Uuid) -> AppResult<Vec<Folder>>;

    /// All folders in the subtree rooted at `id`, excluding `id` itself.
    async fn descendants(&self, id: Uuid) -> AppResult<Vec<Folder>>;

    async fn create(&self, input: CreateFolder) -> AppResult<Folder>;

    /// Move a folder under a new parent, refusing moves that would
    /// create a cycle. The cycle check and the update are a single
    /// atomic statement.
    async fn reparent(
        &self,
        id: Uuid,
        owner_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<ReparentOutcome>;

    /// Delete a folder owned by `owner_id`. Returns `false` when no
    /// such folder exists. Descendant folders and files cascade.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool>;
}

/// File persistence operations.
#[async_trait]
pub trait FileStore: Send + Sync + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// List files directly inside `folder_id` (root level when `None`)
    /// owned by `owner_id`, ordered by filename.
    async fn list_in_folder(&self, owner_id: Uuid, folder_id: Option<Uuid>)
    -> AppResult<Vec<File>>;

    async fn create(&self, input: CreateFile) -> AppResult<File>;

    /// Move a file to another folder. Returns the updated row, or
    /// `None` when no file matched the id and owner.
    async fn set_folder(
        &self,
        id: Uuid,
        owner_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> AppResult<Option<File>>;

    /// Delete a file owned by `owner_id`. Returns `false` when no such
    /// file exists.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool>;
}

/// Share persistence operations.
#[async_trait]
pub trait ShareStore: Send + Sync + 'static {
    async fn create(&self, input: CreateShare) -> AppResult<Share>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>>;

    /// Look up an active share by its token. Deactivated shares are
    /// invisible here by design of the revocation semantics.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>>;

    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<Share>>;

    /// Atomically bump the view counter, returning the new value.
    async fn increment_view_count(&self, id: Uuid) -> AppResult<i32>;

    /// Atomically bump the download counter, returning the new value.
    async fn increment_download_count(&self, id: Uuid) -> AppResult<i32>;

    /// Deactivate a share owned by `owner_id`. Returns `false` when no
    /// such share exists. Idempotent.
    async fn deactivate(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool>;
}

/// Download audit log operations.
#[async_trait]
pub trait DownloadLogStore: Send + Sync + 'static {
    async fn append(&self, input: CreateDownloadLog) -> AppResult<()>;
}
