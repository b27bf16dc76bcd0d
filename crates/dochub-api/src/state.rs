//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use dochub_core::config::AppConfig;
use dochub_core::traits::StorageProvider;
use dochub_database::DatabasePool;
use dochub_service::{DocumentService, FolderService, FolderUploadService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// PostgreSQL pool, absent when running on the in-memory store
    pub db_pool: Option<DatabasePool>,
    /// Document byte storage
    pub storage: Arc<dyn StorageProvider>,

    /// Folder CRUD
    pub folder_service: Arc<FolderService>,
    /// Document CRUD and ingestion
    pub document_service: Arc<DocumentService>,
    /// Streaming folder upload
    pub upload_service: Arc<FolderUploadService>,
}
