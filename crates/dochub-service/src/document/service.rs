//! Document ingestion: store bytes, then record the document.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use dochub_core::error::AppError;
use dochub_database::store::{DocumentStore, FolderStore};
use dochub_entity::document::{CreateDocument, Document};
use dochub_storage::BlobStore;

/// One file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub file_name: String,
    /// File content.
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }
}

/// Partial update of a document.
///
/// `folder_id: Some(None)` unfiles the document.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentRequest {
    pub name: Option<String>,
    pub folder_id: Option<Option<Uuid>>,
}

/// Creates, updates and removes documents together with their stored bytes.
#[derive(Debug, Clone)]
pub struct DocumentService {
    /// Document persistence.
    documents: Arc<dyn DocumentStore>,
    /// Folder persistence, for target checks.
    folders: Arc<dyn FolderStore>,
    /// Byte storage.
    blobs: BlobStore,
    /// Largest accepted file.
    max_upload_size_bytes: u64,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        folders: Arc<dyn FolderStore>,
        blobs: BlobStore,
        max_upload_size_bytes: u64,
    ) -> Self {
        Self {
            documents,
            folders,
            blobs,
            max_upload_size_bytes,
        }
    }

    /// Gets a document by ID.
    pub async fn get_document(&self, document_id: Uuid) -> Result<Document, AppError> {
        self.documents
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))
    }

    /// Stores the file's bytes and inserts its record.
    ///
    /// If the record cannot be written the stored bytes are removed again.
    pub async fn create_document(
        &self,
        file: UploadedFile,
        folder_id: Option<Uuid>,
    ) -> Result<Document, AppError> {
        if file.file_name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if file.data.len() as u64 > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.max_upload_size_bytes
            )));
        }
        if let Some(id) = folder_id {
            self.ensure_folder(id).await?;
        }

        let size = file.data.len();
        let file_url = self.blobs.store(&file.file_name, file.data).await?;

        let record = CreateDocument {
            name: file.file_name,
            file_url,
            folder_id,
        };
        let document = match self.documents.create(&record).await {
            Ok(document) => document,
            Err(e) => {
                if let Err(cleanup) = self.blobs.remove(&record.file_url).await {
                    warn!(file_url = %record.file_url, error = %cleanup, "Orphaned document bytes");
                }
                return Err(e);
            }
        };

        info!(
            document_id = %document.id,
            name = %document.name,
            folder_id = ?document.folder_id,
            size,
            "Document created"
        );

        Ok(document)
    }

    /// Renames and/or moves a document.
    pub async fn update_document(
        &self,
        document_id: Uuid,
        req: UpdateDocumentRequest,
    ) -> Result<Document, AppError> {
        let mut document = self.get_document(document_id).await?;

        if let Some(name) = req.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::validation("Document name cannot be empty"));
            }
            document.name = name.to_string();
        }
        if let Some(folder_id) = req.folder_id {
            if let Some(id) = folder_id {
                self.ensure_folder(id).await?;
            }
            document.folder_id = folder_id;
        }

        let document = self.documents.update(&document).await?;
        info!(document_id = %document.id, folder_id = ?document.folder_id, "Document updated");
        Ok(document)
    }

    /// Deletes a document record and then its bytes.
    pub async fn delete_document(&self, document_id: Uuid) -> Result<(), AppError> {
        let document = self.get_document(document_id).await?;
        if !self.documents.delete(document_id).await? {
            return Err(AppError::not_found("Document not found"));
        }
        if let Err(e) = self.blobs.remove(&document.file_url).await {
            warn!(document_id = %document_id, error = %e, "Failed to remove document bytes");
        }
        info!(document_id = %document_id, "Document deleted");
        Ok(())
    }

    async fn ensure_folder(&self, folder_id: Uuid) -> Result<(), AppError> {
        self.folders
            .find_by_id(folder_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }
}
