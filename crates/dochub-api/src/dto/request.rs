//! Request DTOs with validation.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1-255 characters"))]
    pub name: String,
    /// Parent folder (omitted or null for the tree root).
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// Update folder request body.
///
/// An absent `parent_id` keeps the parent; an explicit `null` moves the
/// folder to the tree root.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1-255 characters"))]
    pub name: Option<String>,
    /// New parent.
    #[serde(default, deserialize_with = "present")]
    pub parent_id: Option<Option<Uuid>>,
}

/// Update document request body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Document name must be 1-255 characters"))]
    pub name: Option<String>,
    /// New folder; explicit `null` unfiles the document.
    #[serde(default, deserialize_with = "present")]
    pub folder_id: Option<Option<Uuid>>,
}

/// Query string for folder details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsQuery {
    /// Case-insensitive name filter.
    pub q: Option<String>,
}

/// Marks a field as present, keeping an explicit `null` as `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
