//! Application builder: wires services, router and middleware.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use tower_http::trace::TraceLayer;

use dochub_core::config::AppConfig;
use dochub_core::traits::StorageProvider;
use dochub_database::{DatabasePool, DocumentStore, FolderStore};
use dochub_service::{DocumentService, FolderService, FolderUploadService, ParentLocks, TreeBuilder};
use dochub_storage::BlobStore;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the service graph over the given stores and byte storage.
pub fn build_state(
    config: AppConfig,
    folders: Arc<dyn FolderStore>,
    documents: Arc<dyn DocumentStore>,
    storage: Arc<dyn StorageProvider>,
    db_pool: Option<DatabasePool>,
) -> AppState {
    let blobs = BlobStore::new(Arc::clone(&storage));

    let document_service = DocumentService::new(
        Arc::clone(&documents),
        Arc::clone(&folders),
        blobs.clone(),
        config.storage.max_upload_size_bytes,
    );
    let folder_service = FolderService::new(Arc::clone(&folders), Arc::clone(&documents), blobs);
    let tree = TreeBuilder::new(
        Arc::clone(&folders),
        Arc::clone(&documents),
        Arc::new(ParentLocks::new()),
        config.upload.name_conflict_retries,
    );
    let upload_service = FolderUploadService::new(folders, document_service.clone(), tree);

    AppState {
        config: Arc::new(config),
        db_pool,
        storage,
        folder_service: Arc::new(folder_service),
        document_service: Arc::new(document_service),
        upload_service: Arc::new(upload_service),
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let max_request = usize::try_from(state.config.storage.max_request_size_bytes)
        .unwrap_or(usize::MAX);
    let cors = build_cors_layer(&state.config.server.cors);

    build_router()
        .layer(DefaultBodyLimit::max(max_request))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}
