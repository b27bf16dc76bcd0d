//! Direct contents of a folder (or of the tree root).

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::folder::Folder;

/// Child folders and documents filed directly under one parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderContents {
    /// Child folders, ordered by name.
    pub folders: Vec<Folder>,
    /// Documents in this folder, ordered by name.
    pub documents: Vec<Document>,
}
