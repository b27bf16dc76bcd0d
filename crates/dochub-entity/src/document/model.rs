//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One uploaded file: its stored bytes reference plus metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// Original file name (not required to be unique).
    pub name: String,
    /// Storage key of the document bytes.
    pub file_url: String,
    /// The folder containing this document (null when unfiled).
    pub folder_id: Option<Uuid>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDocument {
    /// Original file name.
    pub name: String,
    /// Storage key of the already-written bytes.
    pub file_url: String,
    /// Target folder, or None to create the document unfiled.
    pub folder_id: Option<Uuid>,
}
