//! In-memory store implementations shared by the service tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use cove_core::error::AppError;
use cove_core::result::AppResult;
use cove_database::{DownloadLogStore, FileStore, FolderStore, ReparentOutcome, ShareStore};
use cove_entity::audit::{CreateDownloadLog, DownloadLog};
use cove_entity::file::{CreateFile, File};
use cove_entity::folder::{CreateFolder, Folder};
use cove_entity::share::{CreateShare, Share};

/// In-memory folder store.
#[derive(Default)]
pub struct MemoryFolderStore {
    folders: Mutex<HashMap<Uuid, Folder>>,
}

impl MemoryFolderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_descendant_or_self(
        folders: &HashMap<Uuid, Folder>,
        candidate: Uuid,
        ancestor: Uuid,
    ) -> bool {
        let mut current = Some(candidate);
        let mut hops = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            hops += 1;
            if hops > folders.len() {
                break;
            }
            current = folders.get(&id).and_then(|f| f.parent_id);
        }
        false
    }
}

#[async_trait]
impl FolderStore for MemoryFolderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.folders.lock().unwrap().get(&id).cloned())
    }

    async fn list_children(
        &self,
        owner_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AppResult<Vec<Folder>> {
        let mut out: Vec<Folder> = self
            .folders
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.owner_id == owner_id && f.parent_id == parent_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn ancestors(&self, id: Uuid) -> AppResult<Vec<Folder>> {
        let folders = self.folders.lock().unwrap();
        let mut chain = Vec::new();
        let mut current = folders.get(&id).cloned();
        while let Some(folder) = current {
            current = folder.parent_id.and_then(|pid| folders.get(&pid).cloned());
            chain.push(folder);
            if chain.len() > folders.len() {
                break;
            }
        }
        Ok(chain)
    }

    async fn descendants(&self, id: Uuid) -> AppResult<Vec<Folder>> {
        let folders = self.folders.lock().unwrap();
        let mut out = Vec::new();
        let mut frontier = vec![id];
        while let Some(parent) = frontier.pop() {
            for folder in folders.values() {
                if folder.parent_id == Some(parent) {
                    frontier.push(folder.id);
                    out.push(folder.clone());
                }
            }
        }
        Ok(out)
    }

    async fn create(&self, input: CreateFolder) -> AppResult<Folder> {
        let folder = Folder {
            id: Uuid::new_v4(),
            owner_id: input.owner_id,
            parent_id: input.parent_id,
            name: input.name,
            created_at: Utc::now(),
        };
        self.folders
            .lock()
            .unwrap()
            .insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn reparent(
        &self,
        id: Uuid,
        owner_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<ReparentOutcome> {
        let mut folders = self.folders.lock().unwrap();

        let Some(folder) = folders.get(&id) else {
            return Ok(ReparentOutcome::Missing);
        };
        if folder.owner_id != owner_id {
            return Ok(ReparentOutcome::Missing);
        }
        if let Some(target) = new_parent_id {
            match folders.get(&target) {
                Some(dest) if dest.owner_id == owner_id => {}
                _ => return Ok(ReparentOutcome::Missing),
            }
            if Self::is_descendant_or_self(&folders, target, id) {
                return Ok(ReparentOutcome::CycleBlocked);
            }
        }

        let folder = folders.get_mut(&id).unwrap();
        folder.parent_id = new_parent_id;
        Ok(ReparentOutcome::Moved(folder.clone()))
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let mut folders = self.folders.lock().unwrap();
        match folders.get(&id) {
            Some(f) if f.owner_id == owner_id => {}
            _ => return Ok(false),
        }
        // Cascade like the FK does.
        let mut doomed = vec![id];
        let mut frontier = vec![id];
        while let Some(parent) = frontier.pop() {
            let children: Vec<Uuid> = folders
                .values()
                .filter(|f| f.parent_id == Some(parent))
                .map(|f| f.id)
                .collect();
            frontier.extend(&children);
            doomed.extend(&children);
        }
        for id in doomed {
            folders.remove(&id);
        }
        Ok(true)
    }
}

/// In-memory file store.
#[derive(Default)]
pub struct MemoryFileStore {
    files: Mutex<HashMap<Uuid, File>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self.files.lock().unwrap().get(&id).cloned())
    }

    async fn list_in_folder(
        &self,
        owner_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> AppResult<Vec<File>> {
        let mut out: Vec<File> = self
            .files
            .lock()
            .unwrap()
            .values()
            .filter(|f| f.owner_id == owner_id && f.folder_id == folder_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(out)
    }

    async fn create(&self, input: CreateFile) -> AppResult<File> {
        let mut files = self.files.lock().unwrap();
        if files
            .values()
            .any(|f| f.storage_path == input.storage_path)
        {
            return Err(AppError::conflict(
                "A file with this storage path already exists",
            ));
        }
        let file = File {
            id: Uuid::new_v4(),
            owner_id: input.owner_id,
            folder_id: input.folder_id,
            storage_path: input.storage_path,
            filename: input.filename,
            size_bytes: input.size_bytes,
            content_type: input.content_type,
            created_at: Utc::now(),
        };
        files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn set_folder(
        &self,
        id: Uuid,
        owner_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> AppResult<Option<File>> {
        let mut files = self.files.lock().unwrap();
        match files.get_mut(&id) {
            Some(file) if file.owner_id == owner_id => {
                file.folder_id = folder_id;
                Ok(Some(file.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let mut files = self.files.lock().unwrap();
        match files.get(&id) {
            Some(f) if f.owner_id == owner_id => {
                files.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// In-memory share store.
#[derive(Default)]
pub struct MemoryShareStore {
    shares: Mutex<HashMap<Uuid, Share>>,
}

impl MemoryShareStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a share's expiry for test setup.
    pub fn set_expires_at(&self, id: Uuid, expires_at: Option<chrono::DateTime<Utc>>) {
        if let Some(share) = self.shares.lock().unwrap().get_mut(&id) {
            share.expires_at = expires_at;
        }
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn create(&self, input: CreateShare) -> AppResult<Share> {
        let mut shares = self.shares.lock().unwrap();
        if shares.values().any(|s| s.token == input.token) {
            return Err(AppError::conflict("Share token collision"));
        }
        let share = Share {
            id: Uuid::new_v4(),
            owner_id: input.owner_id,
            file_id: input.file_id,
            folder_id: input.folder_id,
            token: input.token,
            share_type: input.share_type,
            permissions: input.permissions,
            is_active: true,
            view_count: 0,
            download_count: 0,
            expires_at: input.expires_at,
            created_at: Utc::now(),
        };
        shares.insert(share.id, share.clone());
        Ok(share)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>> {
        Ok(self.shares.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>> {
        Ok(self
            .shares
            .lock()
            .unwrap()
            .values()
            .find(|s| s.token == token && s.is_active)
            .cloned())
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<Share>> {
        let mut out: Vec<Share> = self
            .shares
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn increment_view_count(&self, id: Uuid) -> AppResult<i32> {
        let mut shares = self.shares.lock().unwrap();
        let share = shares
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        share.view_count += 1;
        Ok(share.view_count)
    }

    async fn increment_download_count(&self, id: Uuid) -> AppResult<i32> {
        let mut shares = self.shares.lock().unwrap();
        let share = shares
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        share.download_count += 1;
        Ok(share.download_count)
    }

    async fn deactivate(&self, id: Uuid, owner_id: Uuid) -> AppResult<bool> {
        let mut shares = self.shares.lock().unwrap();
        match shares.get_mut(&id) {
            Some(share) if share.owner_id == owner_id => {
                share.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// In-memory download log store.
#[derive(Default)]
pub struct MemoryDownloadLogStore {
    entries: Mutex<Vec<DownloadLog>>,
}

impl MemoryDownloadLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<DownloadLog> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadLogStore for MemoryDownloadLogStore {
    async fn append(&self, input: CreateDownloadLog) -> AppResult<()> {
        self.entries.lock().unwrap().push(DownloadLog {
            id: Uuid::new_v4(),
            file_id: input.file_id,
            user_id: input.user_id,
            client_ip: input.client_ip,
            user_agent: input.user_agent,
            created_at: Utc::now(),
        });
        Ok(())
    }
}

/// A download log store whose appends always fail, for exercising the
/// best-effort audit path.
pub struct FailingDownloadLogStore;

#[async_trait]
impl DownloadLogStore for FailingDownloadLogStore {
    async fn append(&self, _input: CreateDownloadLog) -> AppResult<()> {
        Err(AppError::database("Audit table unavailable"))
    }
}

/// Bundle of memory stores plus an in-memory object store, wired the
/// way the server wires the real ones.
pub struct TestHarness {
    pub folders: Arc<MemoryFolderStore>,
    pub files: Arc<MemoryFileStore>,
    pub shares: Arc<MemoryShareStore>,
    pub download_logs: Arc<MemoryDownloadLogStore>,
    pub objects: Arc<cove_storage::MemoryObjectStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            folders: Arc::new(MemoryFolderStore::new()),
            files: Arc::new(MemoryFileStore::new()),
            shares: Arc::new(MemoryShareStore::new()),
            download_logs: Arc::new(MemoryDownloadLogStore::new()),
            objects: Arc::new(cove_storage::MemoryObjectStore::new()),
        }
    }
}
