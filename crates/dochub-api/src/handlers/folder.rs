//! Folder CRUD and listing handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use dochub_entity::folder::{Folder, FolderContents};
use dochub_service::{CreateFolderRequest as SvcCreateFolder, UpdateFolderRequest as SvcUpdateFolder};

use crate::dto::request::{CreateFolderRequest, DetailsQuery, UpdateFolderRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Folder>>), ApiError> {
    let folder = state
        .folder_service
        .create_folder(SvcCreateFolder {
            name: req.name,
            parent_id: req.parent_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    let folder = state.folder_service.get_folder(id).await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// PATCH /api/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateFolderRequest>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    let folder = state
        .folder_service
        .update_folder(
            id,
            SvcUpdateFolder {
                name: req.name,
                parent_id: req.parent_id,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(folder)))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.folder_service.delete_folder(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Folder deleted"))))
}

/// GET /api/folders/details?q=
pub async fn root_details(
    State(state): State<AppState>,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<ApiResponse<FolderContents>>, ApiError> {
    let contents = state
        .folder_service
        .folder_details(None, query.q.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(contents)))
}

/// GET /api/folders/details/{id}?q=
pub async fn folder_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<ApiResponse<FolderContents>>, ApiError> {
    let contents = state
        .folder_service
        .folder_details(Some(id), query.q.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(contents)))
}
