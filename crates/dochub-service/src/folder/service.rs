//! Folder CRUD operations with tree integrity checks.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use dochub_core::error::AppError;
use dochub_database::store::{DocumentStore, FolderStore};
use dochub_entity::folder::{CreateFolder, Folder, FolderContents};
use dochub_storage::BlobStore;

/// Manages folder CRUD operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder persistence.
    folders: Arc<dyn FolderStore>,
    /// Document persistence, for cascade cleanup and listings.
    documents: Arc<dyn DocumentStore>,
    /// Byte storage of documents removed by a cascade.
    blobs: BlobStore,
}

/// Request to create a new folder.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root-level).
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// Partial update of a folder.
///
/// `parent_id: Some(None)` moves the folder to the tree root;
/// `parent_id: None` leaves the parent unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateFolderRequest {
    pub name: Option<String>,
    pub parent_id: Option<Option<Uuid>>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        documents: Arc<dyn DocumentStore>,
        blobs: BlobStore,
    ) -> Self {
        Self {
            folders,
            documents,
            blobs,
        }
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: Uuid) -> Result<Folder, AppError> {
        self.folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    /// Creates a new folder.
    pub async fn create_folder(&self, req: CreateFolderRequest) -> Result<Folder, AppError> {
        let name = validate_name(&req.name)?;

        if let Some(parent_id) = req.parent_id {
            self.folders
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::not_found("Parent folder not found"))?;
        }

        let folder = self
            .folders
            .create(&CreateFolder::new(name, req.parent_id))
            .await?;

        info!(
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            name = %folder.name,
            "Folder created"
        );

        Ok(folder)
    }

    /// Renames and/or moves a folder.
    pub async fn update_folder(
        &self,
        folder_id: Uuid,
        req: UpdateFolderRequest,
    ) -> Result<Folder, AppError> {
        let mut folder = self.get_folder(folder_id).await?;

        if let Some(name) = &req.name {
            folder.name = validate_name(name)?;
        }

        if let Some(new_parent) = req.parent_id {
            if new_parent != folder.parent_id {
                if let Some(parent_id) = new_parent {
                    self.ensure_not_descendant(folder_id, parent_id).await?;
                }
                folder.parent_id = new_parent;
            }
        }

        let folder = self.folders.update(&folder).await?;

        info!(
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            name = %folder.name,
            "Folder updated"
        );

        Ok(folder)
    }

    /// Deletes a folder, its subtree, and every document filed in it.
    ///
    /// Stored bytes of the removed documents are deleted best-effort after
    /// the records are gone.
    pub async fn delete_folder(&self, folder_id: Uuid) -> Result<(), AppError> {
        self.get_folder(folder_id).await?;

        let mut subtree = self.folders.find_descendant_ids(folder_id).await?;
        subtree.push(folder_id);
        let documents = self.documents.find_in_folders(&subtree).await?;

        if !self.folders.delete(folder_id).await? {
            return Err(AppError::not_found("Folder not found"));
        }

        let keys: Vec<&str> = documents.iter().map(|d| d.file_url.as_str()).collect();
        self.blobs.remove_all_best_effort(keys).await;

        info!(
            folder_id = %folder_id,
            folders_removed = subtree.len(),
            documents_removed = documents.len(),
            "Folder deleted"
        );

        Ok(())
    }

    /// Lists the folders and documents directly inside `folder_id`
    /// (the tree root when `None`), optionally filtered by name.
    pub async fn folder_details(
        &self,
        folder_id: Option<Uuid>,
        query: Option<&str>,
    ) -> Result<FolderContents, AppError> {
        if let Some(id) = folder_id {
            self.get_folder(id).await?;
        }
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        let folders = self.folders.find_children(folder_id, query).await?;
        let documents = self.documents.find_in_folder(folder_id, query).await?;

        Ok(FolderContents { folders, documents })
    }

    /// Reject moving `folder_id` under `new_parent_id` when that parent is the
    /// folder itself or lies below it.
    async fn ensure_not_descendant(
        &self,
        folder_id: Uuid,
        new_parent_id: Uuid,
    ) -> Result<(), AppError> {
        let ancestors = self.folders.find_ancestor_ids(new_parent_id).await?;
        if ancestors.is_empty() {
            return Err(AppError::not_found("Target parent folder not found"));
        }
        if ancestors.contains(&folder_id) {
            return Err(AppError::validation(
                "Cannot move a folder into itself or one of its subfolders",
            ));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(AppError::validation(format!("Invalid folder name: {name}")));
    }
    Ok(name.to_string())
}
