//! Folder-upload progress events.
//!
//! A folder upload produces a strictly ordered sequence of these events,
//! ending in exactly one [`UploadStage::Complete`] or [`UploadStage::Error`].
//! Each event is written to the client as one JSON object followed by a
//! newline as soon as it is produced.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Named phase of the folder upload pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadStage {
    /// Input validation. Reserved in the wire schema; request-level
    /// validation failures are rejected before the stream starts.
    #[serde(rename = "file_validation")]
    Validation,
    /// Storing bytes and creating one document record per file.
    #[serde(rename = "document_creation")]
    DocumentCreation,
    /// Resolving the destination root and creating folder nodes.
    #[serde(rename = "folder_structure")]
    FolderStructure,
    /// Persisting document-to-folder links.
    #[serde(rename = "file_folder_relation")]
    RelationUpdate,
    /// Terminal failure; nothing follows.
    #[serde(rename = "error")]
    Error,
    /// Terminal success; nothing follows.
    #[serde(rename = "upload_complete")]
    Complete,
}

impl UploadStage {
    /// Name used on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Validation => "file_validation",
            Self::DocumentCreation => "document_creation",
            Self::FolderStructure => "folder_structure",
            Self::RelationUpdate => "file_folder_relation",
            Self::Error => "error",
            Self::Complete => "upload_complete",
        }
    }
}

/// One progress record in the folder upload stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Pipeline stage this event belongs to.
    pub stage: UploadStage,
    /// Human-readable description.
    pub message: String,
    /// Documents created so far (`document_creation` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_count: Option<usize>,
    /// Number of files in the request (`document_creation` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_files_count: Option<usize>,
    /// Failure description for an isolated per-file or per-path failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of files in the request (`upload_complete` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_files: Option<usize>,
    /// Folders created by this run (`upload_complete` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_folders: Option<usize>,
}

impl ProgressEvent {
    /// A bare stage transition with only a message.
    pub fn stage(stage: UploadStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            created_count: None,
            valid_files_count: None,
            error: None,
            total_files: None,
            total_folders: None,
        }
    }

    /// Start of the document creation loop.
    pub fn documents_started(valid_files_count: usize) -> Self {
        Self {
            created_count: Some(0),
            valid_files_count: Some(valid_files_count),
            ..Self::stage(UploadStage::DocumentCreation, "Creating documents")
        }
    }

    /// One document was stored and recorded.
    pub fn document_created(file_name: &str, created_count: usize, valid_files_count: usize) -> Self {
        Self {
            created_count: Some(created_count),
            valid_files_count: Some(valid_files_count),
            ..Self::stage(
                UploadStage::DocumentCreation,
                format!("Successfully created document: {file_name}"),
            )
        }
    }

    /// One document failed; the run continues without it.
    pub fn document_failed(
        file_name: &str,
        error: &AppError,
        created_count: usize,
        valid_files_count: usize,
    ) -> Self {
        Self {
            created_count: Some(created_count),
            valid_files_count: Some(valid_files_count),
            error: Some(error.message.clone()),
            ..Self::stage(
                UploadStage::DocumentCreation,
                format!("Failed to create document: {file_name}"),
            )
        }
    }

    /// Folder creation for one path failed; its documents stay unfiled.
    pub fn path_failed(path: &str, error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::stage(
                UploadStage::FolderStructure,
                format!("Failed to create folder structure for: {path}"),
            )
        }
    }

    /// Terminal success.
    pub fn complete(total_files: usize, total_folders: usize) -> Self {
        Self {
            total_files: Some(total_files),
            total_folders: Some(total_folders),
            ..Self::stage(UploadStage::Complete, "Upload complete")
        }
    }

    /// Terminal failure.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::stage(UploadStage::Error, message)
    }

    /// Serialize as one newline-terminated JSON line.
    pub fn to_line(&self) -> AppResult<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
