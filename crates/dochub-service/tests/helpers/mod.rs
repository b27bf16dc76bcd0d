//! Shared test helpers for service integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tempfile::TempDir;
use uuid::Uuid;

use dochub_core::error::AppError;
use dochub_core::events::ProgressEvent;
use dochub_core::result::AppResult;
use dochub_core::traits::StorageProvider;
use dochub_database::{DocumentStore, FolderStore, MemoryStore};
use dochub_entity::document::{CreateDocument, Document};
use dochub_entity::folder::{CreateFolder, Folder};
use dochub_service::{
    DocumentService, FolderService, FolderUploadRequest, FolderUploadService, ParentLocks,
    TreeBuilder, UploadedFile,
};
use dochub_storage::{BlobStore, LocalStorageProvider};

/// Upper bound on a single file in tests.
pub const MAX_UPLOAD: u64 = 1024;

/// Services wired against an in-memory store and a temporary directory.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub blobs: BlobStore,
    pub documents: DocumentService,
    pub folders: FolderService,
    pub upload: FolderUploadService,
    _dir: TempDir,
}

impl TestApp {
    /// Local disk storage.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let provider = LocalStorageProvider::new(dir.path().to_str().expect("utf-8 temp path"))
            .await
            .expect("Failed to init storage");
        let store = Arc::new(MemoryStore::new());
        Self::with_provider(Arc::new(provider), dir, store.clone(), store.clone(), store)
    }

    /// Local disk storage that refuses to store any file whose name
    /// contains `marker`.
    pub async fn failing_on(marker: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let inner = LocalStorageProvider::new(dir.path().to_str().expect("utf-8 temp path"))
            .await
            .expect("Failed to init storage");
        let provider = FailingProvider {
            inner,
            marker: marker.to_string(),
        };
        let store = Arc::new(MemoryStore::new());
        Self::with_provider(Arc::new(provider), dir, store.clone(), store.clone(), store)
    }

    /// Folder inserts lose the race for their name `conflicts` times: another
    /// writer takes the exact name just before each insert.
    pub async fn racing_folders(conflicts: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        let folders = Arc::new(RacingFolders {
            inner: store.clone(),
            conflicts: AtomicU32::new(conflicts),
        });
        Self::with_stores(store.clone(), folders, store).await
    }

    /// The batch folder assignment always fails with a database error.
    pub async fn failing_assignments(message: &str) -> Self {
        let store = Arc::new(MemoryStore::new());
        let documents = Arc::new(FailingAssignments {
            inner: store.clone(),
            message: message.to_string(),
        });
        Self::with_stores(store.clone(), store, documents).await
    }

    async fn with_stores(
        store: Arc<MemoryStore>,
        folder_store: Arc<dyn FolderStore>,
        document_store: Arc<dyn DocumentStore>,
    ) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let provider = LocalStorageProvider::new(dir.path().to_str().expect("utf-8 temp path"))
            .await
            .expect("Failed to init storage");
        Self::with_provider(Arc::new(provider), dir, store, folder_store, document_store)
    }

    fn with_provider(
        provider: Arc<dyn StorageProvider>,
        dir: TempDir,
        store: Arc<MemoryStore>,
        folder_store: Arc<dyn FolderStore>,
        document_store: Arc<dyn DocumentStore>,
    ) -> Self {
        let blobs = BlobStore::new(provider);
        let documents = DocumentService::new(
            document_store.clone(),
            folder_store.clone(),
            blobs.clone(),
            MAX_UPLOAD,
        );
        let folders = FolderService::new(folder_store.clone(), document_store.clone(), blobs.clone());
        let tree = TreeBuilder::new(
            folder_store.clone(),
            document_store,
            Arc::new(ParentLocks::new()),
            3,
        );
        let upload = FolderUploadService::new(folder_store, documents.clone(), tree);

        Self {
            store,
            blobs,
            documents,
            folders,
            upload,
            _dir: dir,
        }
    }

    /// Run a folder upload where each file's content is its path.
    pub async fn upload(&self, paths: &[&str], folder_id: Option<Uuid>) -> Vec<ProgressEvent> {
        let files = paths
            .iter()
            .map(|p| {
                let name = p.rsplit('/').next().unwrap_or(p);
                UploadedFile::new(name, Bytes::copy_from_slice(p.as_bytes()))
            })
            .collect();
        let request = FolderUploadRequest::new(
            paths.iter().map(|p| p.to_string()).collect(),
            files,
            folder_id,
        )
        .expect("valid upload request");
        self.upload.stream_progress(request).collect().await
    }

    pub async fn create_folder(&self, name: &str, parent_id: Option<Uuid>) -> Folder {
        FolderStore::create(self.store.as_ref(), &CreateFolder::new(name, parent_id))
            .await
            .expect("Failed to create folder")
    }

    /// The folder at `names` walked from the tree root.
    pub async fn folder_at(&self, names: &[&str]) -> Option<Folder> {
        let mut parent = None;
        let mut found = None;
        for name in names {
            let folder = self
                .store
                .find_by_name(parent, name)
                .await
                .expect("lookup failed")?;
            parent = Some(folder.id);
            found = Some(folder);
        }
        found
    }

    pub async fn children(&self, parent_id: Option<Uuid>) -> Vec<String> {
        self.store
            .find_children(parent_id, None)
            .await
            .expect("list failed")
            .into_iter()
            .map(|f| f.name)
            .collect()
    }

    pub async fn documents_in(&self, folder_id: Option<Uuid>) -> Vec<Document> {
        self.store
            .find_in_folder(folder_id, None)
            .await
            .expect("list failed")
    }
}

/// Stage names of `events`, in order.
pub fn stages(events: &[ProgressEvent]) -> Vec<String> {
    events
        .iter()
        .map(|e| {
            serde_json::to_value(e.stage)
                .expect("stage serializes")
                .as_str()
                .expect("stage is a string")
                .to_string()
        })
        .collect()
}

#[derive(Debug)]
struct FailingProvider {
    inner: LocalStorageProvider,
    marker: String,
}

#[async_trait]
impl StorageProvider for FailingProvider {
    fn provider_type(&self) -> &str {
        "failing"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        self.inner.read_bytes(path).await
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        if path.contains(&self.marker) {
            return Err(AppError::storage("Disk quota exceeded"));
        }
        self.inner.write(path, data).await
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.inner.delete(path).await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        self.inner.exists(path).await
    }
}

/// Delegates to a [`MemoryStore`], but while `conflicts` is non-zero each
/// `create` first inserts the requested folder itself and then reports a
/// unique-name conflict, as a concurrent process would cause.
#[derive(Debug)]
struct RacingFolders {
    inner: Arc<MemoryStore>,
    conflicts: AtomicU32,
}

#[async_trait]
impl FolderStore for RacingFolders {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        FolderStore::find_by_id(self.inner.as_ref(), id).await
    }

    async fn find_by_name(&self, parent_id: Option<Uuid>, name: &str) -> AppResult<Option<Folder>> {
        self.inner.find_by_name(parent_id, name).await
    }

    async fn find_children(
        &self,
        parent_id: Option<Uuid>,
        name_filter: Option<&str>,
    ) -> AppResult<Vec<Folder>> {
        self.inner.find_children(parent_id, name_filter).await
    }

    async fn find_ancestor_ids(&self, id: Uuid) -> AppResult<Vec<Uuid>> {
        self.inner.find_ancestor_ids(id).await
    }

    async fn find_descendant_ids(&self, id: Uuid) -> AppResult<Vec<Uuid>> {
        self.inner.find_descendant_ids(id).await
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let raced = self
            .conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if raced {
            FolderStore::create(self.inner.as_ref(), data).await?;
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists here",
                data.name
            )));
        }
        FolderStore::create(self.inner.as_ref(), data).await
    }

    async fn update(&self, folder: &Folder) -> AppResult<Folder> {
        FolderStore::update(self.inner.as_ref(), folder).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        FolderStore::delete(self.inner.as_ref(), id).await
    }
}

/// Delegates to a [`MemoryStore`] except for `assign_folders`, which fails.
#[derive(Debug)]
struct FailingAssignments {
    inner: Arc<MemoryStore>,
    message: String,
}

#[async_trait]
impl DocumentStore for FailingAssignments {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        DocumentStore::find_by_id(self.inner.as_ref(), id).await
    }

    async fn find_in_folder(
        &self,
        folder_id: Option<Uuid>,
        name_filter: Option<&str>,
    ) -> AppResult<Vec<Document>> {
        self.inner.find_in_folder(folder_id, name_filter).await
    }

    async fn find_in_folders(&self, folder_ids: &[Uuid]) -> AppResult<Vec<Document>> {
        self.inner.find_in_folders(folder_ids).await
    }

    async fn create(&self, data: &CreateDocument) -> AppResult<Document> {
        DocumentStore::create(self.inner.as_ref(), data).await
    }

    async fn update(&self, document: &Document) -> AppResult<Document> {
        DocumentStore::update(self.inner.as_ref(), document).await
    }

    async fn assign_folders(&self, _assignments: &[(Uuid, Option<Uuid>)]) -> AppResult<u64> {
        Err(AppError::database(self.message.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        DocumentStore::delete(self.inner.as_ref(), id).await
    }
}
