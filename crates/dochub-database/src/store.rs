//! Persistence seams used by the service layer.
//!
//! Services hold `Arc<dyn FolderStore>` / `Arc<dyn DocumentStore>` so the
//! same pipeline runs against Postgres in production and against
//! [`MemoryStore`](crate::memory::MemoryStore) in tests.
//! Every implementation must enforce the same constraints:
//!
//! - folder names are unique among siblings (including root-level
//!   folders); a violating insert or update fails with a `Conflict` error;
//! - a referenced parent or folder that does not exist fails with
//!   `NotFound`;
//! - deleting a folder removes its subtree and the documents filed in it.

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use dochub_core::result::AppResult;
use dochub_entity::document::{CreateDocument, Document};
use dochub_entity::folder::{CreateFolder, Folder};

/// Folder persistence.
#[async_trait]
pub trait FolderStore: Send + Sync + fmt::Debug + 'static {
    /// Find a folder by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// Find the sibling named `name` under `parent_id` (None = tree root).
    async fn find_by_name(&self, parent_id: Option<Uuid>, name: &str)
    -> AppResult<Option<Folder>>;

    /// List direct children of `parent_id`, optionally filtered by a
    /// case-insensitive substring of the name. Ordered by name.
    async fn find_children(
        &self,
        parent_id: Option<Uuid>,
        name_filter: Option<&str>,
    ) -> AppResult<Vec<Folder>>;

    /// The chain `id, parent(id), parent(parent(id)), ...` up to the root.
    /// Empty when `id` does not exist.
    async fn find_ancestor_ids(&self, id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Every folder below `id`, excluding `id` itself.
    async fn find_descendant_ids(&self, id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Insert a folder and return it with its assigned ID.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Persist a changed name and/or parent.
    async fn update(&self, folder: &Folder) -> AppResult<Folder>;

    /// Delete a folder and its subtree. Returns `true` if it existed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Document persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug + 'static {
    /// Find a document by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>>;

    /// List documents filed under `folder_id` (None = unfiled), optionally
    /// filtered by a case-insensitive substring of the name.
    async fn find_in_folder(
        &self,
        folder_id: Option<Uuid>,
        name_filter: Option<&str>,
    ) -> AppResult<Vec<Document>>;

    /// List documents filed under any of `folder_ids`.
    async fn find_in_folders(&self, folder_ids: &[Uuid]) -> AppResult<Vec<Document>>;

    /// Insert a document record.
    async fn create(&self, data: &CreateDocument) -> AppResult<Document>;

    /// Persist a changed name and/or folder.
    async fn update(&self, document: &Document) -> AppResult<Document>;

    /// Set `folder_id` for many documents in one transaction.
    ///
    /// Documents that no longer exist are skipped. A missing target folder
    /// fails the whole batch. Returns the number of documents updated.
    async fn assign_folders(&self, assignments: &[(Uuid, Option<Uuid>)]) -> AppResult<u64>;

    /// Delete a document record. Returns `true` if it existed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
