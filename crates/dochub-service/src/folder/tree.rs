//! Reconciles uploaded paths into the folder tree.
//!
//! Each distinct normalized path is walked root to leaf. Missing folder
//! segments are created immediately (so later paths sharing the prefix find
//! them in the [`FolderMapper`]) and documents are queued for their leaf's
//! parent folder. The queued assignments are written in one batch by
//! [`TreeBuilder::finalize`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use dochub_core::error::AppError;
use dochub_database::store::{DocumentStore, FolderStore};
use dochub_entity::document::Document;
use dochub_entity::folder::{CreateFolder, Folder};

use super::lock::ParentLocks;
use super::naming;
use crate::path;

/// Run-scoped map from normalized path to the folder resolved for it.
#[derive(Debug, Default)]
pub struct FolderMapper {
    folders: HashMap<String, Folder>,
    root_key: Option<String>,
}

impl FolderMapper {
    /// An empty mapper: paths start at the tree root.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapper seeded with the destination folder under its own name.
    pub fn with_root(root: Folder) -> Self {
        let key = path::normalize(&root.name, None);
        let mut folders = HashMap::new();
        folders.insert(key.clone(), root);
        Self {
            folders,
            root_key: Some(key),
        }
    }

    /// The key the destination folder is stored under, if any.
    pub fn root_key(&self) -> Option<&str> {
        self.root_key.as_deref()
    }

    pub fn get(&self, path: &str) -> Option<&Folder> {
        self.folders.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.folders.contains_key(path)
    }

    fn insert(&mut self, path: String, folder: Folder) {
        self.folders.insert(path, folder);
    }

    /// Folders resolved during this run, excluding the destination root.
    pub fn created_count(&self) -> usize {
        self.folders.len() - usize::from(self.root_key.is_some())
    }
}

/// A folder that was created under a different name than its path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamedFolder {
    /// Normalized path the folder was created for.
    pub original_path: String,
    /// Name actually persisted.
    pub new_name: String,
    /// Normalized path of the parent, `None` at the tree root.
    pub parent_path: Option<String>,
}

/// A path whose walk stopped on an error. Its documents stay unfiled.
#[derive(Debug, Clone)]
pub struct FailedPath {
    pub path: String,
    pub error: AppError,
}

/// Result of walking all paths, before assignments are persisted.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Documents with `folder_id` set to their resolved folder, not yet saved.
    pub pending: Vec<Document>,
    pub folders_created: Vec<Folder>,
    pub renamed: Vec<RenamedFolder>,
    pub failed_paths: Vec<FailedPath>,
}

/// Creates folder nodes for uploaded paths and files documents into them.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    folders: Arc<dyn FolderStore>,
    documents: Arc<dyn DocumentStore>,
    locks: Arc<ParentLocks>,
    conflict_retries: u32,
}

impl TreeBuilder {
    /// Creates a new tree builder.
    ///
    /// `locks` should be shared by every builder in the process.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        documents: Arc<dyn DocumentStore>,
        locks: Arc<ParentLocks>,
        conflict_retries: u32,
    ) -> Self {
        Self {
            folders,
            documents,
            locks,
            conflict_retries,
        }
    }

    /// Create missing folders for every path and queue document assignments.
    ///
    /// A failure on one path is recorded and does not stop the others.
    pub async fn walk(
        &self,
        paths: &[String],
        documents_by_path: &HashMap<String, Vec<Document>>,
        mapper: &mut FolderMapper,
    ) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        let mut seen = HashSet::new();

        for full_path in paths {
            if !seen.insert(full_path.as_str()) {
                continue;
            }
            let documents = documents_by_path
                .get(full_path)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if let Err(error) = self
                .walk_path(full_path, documents, mapper, &mut outcome)
                .await
            {
                warn!(path = %full_path, error = %error, "Folder structure failed for path");
                outcome.failed_paths.push(FailedPath {
                    path: full_path.clone(),
                    error,
                });
            }
        }

        self.locks.release_idle();
        outcome
    }

    /// Persist queued assignments in one batch.
    ///
    /// Documents deleted since the walk are skipped by the store; the count
    /// actually written is returned.
    pub async fn finalize(&self, pending: &[Document]) -> Result<u64, AppError> {
        if pending.is_empty() {
            return Ok(0);
        }
        let assignments: Vec<(Uuid, Option<Uuid>)> =
            pending.iter().map(|d| (d.id, d.folder_id)).collect();
        let updated = self.documents.assign_folders(&assignments).await?;
        if updated < pending.len() as u64 {
            warn!(
                updated,
                queued = pending.len(),
                "Some documents vanished before folder assignment"
            );
        } else {
            debug!(updated, "Document folder assignments saved");
        }
        Ok(updated)
    }

    async fn walk_path(
        &self,
        full_path: &str,
        documents: &[Document],
        mapper: &mut FolderMapper,
        outcome: &mut WalkOutcome,
    ) -> Result<(), AppError> {
        check_containment(full_path, mapper.root_key())?;

        let segments = path::segments(full_path);
        for (i, segment) in segments.iter().enumerate() {
            let current = segments[..=i].join("/");
            let parent_path = (i > 0).then(|| segments[..i].join("/"));
            let parent_id = match &parent_path {
                Some(p) => Some(
                    mapper
                        .get(p)
                        .map(|f| f.id)
                        .ok_or_else(|| AppError::not_found("Parent folder not found"))?,
                ),
                None => None,
            };

            let is_leaf = i + 1 == segments.len();
            if is_leaf && path::is_file_segment(segment) {
                for document in documents {
                    let mut document = document.clone();
                    document.folder_id = parent_id;
                    outcome.pending.push(document);
                }
                return Ok(());
            }

            if mapper.contains(&current) {
                continue;
            }

            let (folder, renamed) = self.create_folder(segment, parent_id).await?;
            if renamed {
                outcome.renamed.push(RenamedFolder {
                    original_path: current.clone(),
                    new_name: folder.name.clone(),
                    parent_path: parent_path.clone(),
                });
            }
            outcome.folders_created.push(folder.clone());
            mapper.insert(current, folder);
        }

        if !documents.is_empty() {
            warn!(
                path = %full_path,
                count = documents.len(),
                "Leaf has no extension and was treated as a folder; documents left unfiled"
            );
        }
        Ok(())
    }

    /// Resolve a free name and insert the folder while holding the parent's
    /// lock. A unique-index conflict from a concurrent writer re-resolves.
    async fn create_folder(
        &self,
        desired: &str,
        parent_id: Option<Uuid>,
    ) -> Result<(Folder, bool), AppError> {
        let _guard = self.locks.lock(parent_id).await;

        let mut attempt = 0;
        loop {
            let (name, renamed) =
                naming::resolve_name(self.folders.as_ref(), desired, parent_id).await?;
            match self.folders.create(&CreateFolder::new(name, parent_id)).await {
                Ok(folder) => {
                    info!(
                        folder_id = %folder.id,
                        name = %folder.name,
                        parent_id = ?parent_id,
                        renamed,
                        "Folder created"
                    );
                    return Ok((folder, renamed));
                }
                Err(e) if e.is_conflict() && attempt < self.conflict_retries => {
                    attempt += 1;
                    debug!(name = %desired, attempt, "Sibling name taken concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn check_containment(full_path: &str, root_key: Option<&str>) -> Result<(), AppError> {
    if path::segments(full_path).is_empty() {
        return Err(AppError::validation("Path is empty"));
    }
    if path::escapes_root(full_path) {
        return Err(AppError::validation(format!(
            "Path escapes the upload root: {full_path}"
        )));
    }
    if let Some(root) = root_key {
        let inside = full_path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'));
        if !inside {
            return Err(AppError::validation(format!(
                "Path escapes the destination folder: {full_path}"
            )));
        }
    }
    Ok(())
}
