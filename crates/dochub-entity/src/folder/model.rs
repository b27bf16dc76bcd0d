//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A folder in the document hierarchy.
///
/// Folders form a strict tree through `parent_id`; children are found by
/// querying on `parent_id`, never through a stored back-reference. The
/// name is unique among folders sharing the same parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (null for folders at the tree root).
    pub parent_id: Option<Uuid>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this folder sits at the tree root (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder (None for the tree root).
    pub parent_id: Option<Uuid>,
}

impl CreateFolder {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self {
            name: name.into(),
            parent_id,
        }
    }
}
