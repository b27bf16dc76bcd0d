//! In-memory store backing the service and HTTP test suites.
//!
//! Enforces the same constraints as the Postgres schema: sibling-name
//! uniqueness, existing parent references, and cascading deletes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use dochub_core::error::AppError;
use dochub_core::result::AppResult;
use dochub_entity::document::{CreateDocument, Document};
use dochub_entity::folder::{CreateFolder, Folder};

use crate::store::{DocumentStore, FolderStore};

#[derive(Debug, Default)]
struct State {
    folders: HashMap<Uuid, Folder>,
    documents: HashMap<Uuid, Document>,
}

impl State {
    fn sibling_taken(&self, parent_id: Option<Uuid>, name: &str, except: Option<Uuid>) -> bool {
        self.folders
            .values()
            .any(|f| f.parent_id == parent_id && f.name == name && Some(f.id) != except)
    }

    fn require_folder(&self, id: Option<Uuid>) -> AppResult<()> {
        match id {
            Some(id) if !self.folders.contains_key(&id) => {
                Err(AppError::not_found(format!("Folder {id} not found")))
            }
            _ => Ok(()),
        }
    }

    fn descendants(&self, id: Uuid) -> Vec<Uuid> {
        let mut found = Vec::new();
        let mut frontier = vec![id];
        let mut seen = HashSet::from([id]);
        while let Some(current) = frontier.pop() {
            for folder in self.folders.values() {
                if folder.parent_id == Some(current) && seen.insert(folder.id) {
                    found.push(folder.id);
                    frontier.push(folder.id);
                }
            }
        }
        found
    }
}

fn matches_filter(name: &str, filter: Option<&str>) -> bool {
    filter.is_none_or(|q| name.to_lowercase().contains(&q.to_lowercase()))
}

/// Thread-safe in-memory implementation of both store traits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of folders currently stored.
    pub async fn folder_count(&self) -> usize {
        self.state.read().await.folders.len()
    }

    /// Number of documents currently stored.
    pub async fn document_count(&self) -> usize {
        self.state.read().await.documents.len()
    }

    /// Snapshot of every document, ordered by name.
    pub async fn all_documents(&self) -> Vec<Document> {
        let mut docs: Vec<Document> = self.state.read().await.documents.values().cloned().collect();
        docs.sort_by(|a, b| a.name.cmp(&b.name));
        docs
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.state.read().await.folders.get(&id).cloned())
    }

    async fn find_by_name(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        Ok(self
            .state
            .read()
            .await
            .folders
            .values()
            .find(|f| f.parent_id == parent_id && f.name == name)
            .cloned())
    }

    async fn find_children(
        &self,
        parent_id: Option<Uuid>,
        name_filter: Option<&str>,
    ) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        let mut children: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.parent_id == parent_id && matches_filter(&f.name, name_filter))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn find_ancestor_ids(&self, id: Uuid) -> AppResult<Vec<Uuid>> {
        let state = self.state.read().await;
        let mut chain = Vec::new();
        let mut current = state.folders.get(&id);
        while let Some(folder) = current {
            if chain.contains(&folder.id) {
                break;
            }
            chain.push(folder.id);
            current = folder.parent_id.and_then(|p| state.folders.get(&p));
        }
        Ok(chain)
    }

    async fn find_descendant_ids(&self, id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self.state.read().await.descendants(id))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        state.require_folder(data.parent_id)?;
        if state.sibling_taken(data.parent_id, &data.name, None) {
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists here",
                data.name
            )));
        }

        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            parent_id: data.parent_id,
            created_at: now,
            updated_at: now,
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn update(&self, folder: &Folder) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        if !state.folders.contains_key(&folder.id) {
            return Err(AppError::not_found(format!("Folder {} not found", folder.id)));
        }
        state.require_folder(folder.parent_id)?;
        if state.sibling_taken(folder.parent_id, &folder.name, Some(folder.id)) {
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists here",
                folder.name
            )));
        }

        let mut updated = folder.clone();
        updated.updated_at = Utc::now();
        state.folders.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.folders.remove(&id).is_none() {
            return Ok(false);
        }
        let mut removed: HashSet<Uuid> = state.descendants(id).into_iter().collect();
        for child in &removed {
            state.folders.remove(child);
        }
        removed.insert(id);
        state
            .documents
            .retain(|_, doc| !doc.folder_id.is_some_and(|f| removed.contains(&f)));
        Ok(true)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        Ok(self.state.read().await.documents.get(&id).cloned())
    }

    async fn find_in_folder(
        &self,
        folder_id: Option<Uuid>,
        name_filter: Option<&str>,
    ) -> AppResult<Vec<Document>> {
        let state = self.state.read().await;
        let mut docs: Vec<Document> = state
            .documents
            .values()
            .filter(|d| d.folder_id == folder_id && matches_filter(&d.name, name_filter))
            .cloned()
            .collect();
        docs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(docs)
    }

    async fn find_in_folders(&self, folder_ids: &[Uuid]) -> AppResult<Vec<Document>> {
        let state = self.state.read().await;
        Ok(state
            .documents
            .values()
            .filter(|d| d.folder_id.is_some_and(|f| folder_ids.contains(&f)))
            .cloned()
            .collect())
    }

    async fn create(&self, data: &CreateDocument) -> AppResult<Document> {
        let mut state = self.state.write().await;
        state.require_folder(data.folder_id)?;

        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            file_url: data.file_url.clone(),
            folder_id: data.folder_id,
            created_at: now,
            updated_at: now,
        };
        state.documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn update(&self, document: &Document) -> AppResult<Document> {
        let mut state = self.state.write().await;
        if !state.documents.contains_key(&document.id) {
            return Err(AppError::not_found(format!(
                "Document {} not found",
                document.id
            )));
        }
        state.require_folder(document.folder_id)?;

        let mut updated = document.clone();
        updated.updated_at = Utc::now();
        state.documents.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn assign_folders(&self, assignments: &[(Uuid, Option<Uuid>)]) -> AppResult<u64> {
        let mut state = self.state.write().await;
        for (_, folder_id) in assignments {
            state.require_folder(*folder_id)?;
        }

        let now = Utc::now();
        let mut updated = 0;
        for (document_id, folder_id) in assignments {
            match state.documents.get_mut(document_id) {
                Some(doc) => {
                    doc.folder_id = *folder_id;
                    doc.updated_at = now;
                    updated += 1;
                }
                None => {
                    warn!(document_id = %document_id, "Document gone before folder assignment, skipped");
                }
            }
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.write().await.documents.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, folder_id: Option<Uuid>) -> CreateDocument {
        CreateDocument {
            name: name.to_string(),
            file_url: format!("key_{name}"),
            folder_id,
        }
    }

    #[tokio::test]
    async fn test_sibling_names_are_unique_per_parent() {
        let store = MemoryStore::new();
        let a = FolderStore::create(&store, &CreateFolder::new("a", None))
            .await
            .unwrap();

        let dup = FolderStore::create(&store, &CreateFolder::new("a", None)).await;
        assert!(dup.unwrap_err().is_conflict());

        // Same name under a different parent is fine.
        FolderStore::create(&store, &CreateFolder::new("a", Some(a.id)))
            .await
            .unwrap();
        assert_eq!(store.folder_count().await, 2);
    }

    #[tokio::test]
    async fn test_missing_parent_is_not_found() {
        let store = MemoryStore::new();
        let err = FolderStore::create(&store, &CreateFolder::new("a", Some(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = DocumentStore::create(&store, &doc("x.txt", Some(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_ancestors_and_descendants() {
        let store = MemoryStore::new();
        let a = FolderStore::create(&store, &CreateFolder::new("a", None)).await.unwrap();
        let b = FolderStore::create(&store, &CreateFolder::new("b", Some(a.id))).await.unwrap();
        let c = FolderStore::create(&store, &CreateFolder::new("c", Some(b.id))).await.unwrap();

        assert_eq!(store.find_ancestor_ids(c.id).await.unwrap(), vec![c.id, b.id, a.id]);
        assert!(store.find_ancestor_ids(Uuid::new_v4()).await.unwrap().is_empty());

        let mut below = store.find_descendant_ids(a.id).await.unwrap();
        below.sort();
        let mut expected = vec![b.id, c.id];
        expected.sort();
        assert_eq!(below, expected);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_subtree_and_documents() {
        let store = MemoryStore::new();
        let a = FolderStore::create(&store, &CreateFolder::new("a", None)).await.unwrap();
        let b = FolderStore::create(&store, &CreateFolder::new("b", Some(a.id))).await.unwrap();
        DocumentStore::create(&store, &doc("in_b.txt", Some(b.id))).await.unwrap();
        DocumentStore::create(&store, &doc("loose.txt", None)).await.unwrap();

        assert!(FolderStore::delete(&store, a.id).await.unwrap());
        assert_eq!(store.folder_count().await, 0);
        let remaining = store.all_documents().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "loose.txt");

        assert!(!FolderStore::delete(&store, a.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_assign_folders_rejects_missing_folder_atomically() {
        let store = MemoryStore::new();
        let folder = FolderStore::create(&store, &CreateFolder::new("f", None)).await.unwrap();
        let d1 = DocumentStore::create(&store, &doc("1.txt", None)).await.unwrap();
        let d2 = DocumentStore::create(&store, &doc("2.txt", None)).await.unwrap();

        let err = store
            .assign_folders(&[(d1.id, Some(folder.id)), (d2.id, Some(Uuid::new_v4()))])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        let unchanged = DocumentStore::find_by_id(&store, d1.id).await.unwrap().unwrap();
        assert_eq!(unchanged.folder_id, None);
    }

    #[tokio::test]
    async fn test_assign_folders_skips_vanished_documents() {
        let store = MemoryStore::new();
        let folder = FolderStore::create(&store, &CreateFolder::new("f", None)).await.unwrap();
        let d1 = DocumentStore::create(&store, &doc("1.txt", None)).await.unwrap();

        let n = store
            .assign_folders(&[(Uuid::new_v4(), Some(folder.id)), (d1.id, Some(folder.id))])
            .await
            .unwrap();
        assert_eq!(n, 1);
        let moved = store.find_in_folder(Some(folder.id), None).await.unwrap();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].id, d1.id);
    }

    #[tokio::test]
    async fn test_name_filter_is_case_insensitive() {
        let store = MemoryStore::new();
        FolderStore::create(&store, &CreateFolder::new("Reports", None)).await.unwrap();
        FolderStore::create(&store, &CreateFolder::new("photos", None)).await.unwrap();

        let hits = store.find_children(None, Some("REP")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Reports");
        assert_eq!(store.find_children(None, None).await.unwrap().len(), 2);
    }
}
