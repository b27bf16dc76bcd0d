//! Route definitions for the DocHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the route tree. State is supplied by the caller.
pub fn build_router() -> Router<AppState> {
    let api_routes = Router::new()
        .merge(upload_routes())
        .merge(folder_routes())
        .merge(document_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes)
}

/// Streaming folder upload
fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/folder-upload", post(handlers::upload::upload_folder))
        .route(
            "/folder-upload/{folder_id}",
            post(handlers::upload::upload_folder_into),
        )
}

/// Folder CRUD and listings
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", post(handlers::folder::create_folder))
        .route(
            "/folders/{id}",
            get(handlers::folder::get_folder)
                .patch(handlers::folder::update_folder)
                .delete(handlers::folder::delete_folder),
        )
        .route("/folders/details", get(handlers::folder::root_details))
        .route("/folders/details/{id}", get(handlers::folder::folder_details))
}

/// Document CRUD
fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/documents", post(handlers::document::create_document))
        .route(
            "/documents/{id}",
            get(handlers::document::get_document)
                .post(handlers::document::create_document_in)
                .patch(handlers::document::update_document)
                .delete(handlers::document::delete_document),
        )
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
