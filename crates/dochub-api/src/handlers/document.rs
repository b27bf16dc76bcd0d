//! Document CRUD handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use dochub_core::error::AppError;
use dochub_entity::document::Document;
use dochub_service::{UpdateDocumentRequest as SvcUpdateDocument, UploadedFile};

use crate::dto::request::UpdateDocumentRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/documents (multipart `file`)
pub async fn create_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Document>>), ApiError> {
    create(state, multipart, None).await
}

/// POST /api/documents/{folder_id} (multipart `file`)
pub async fn create_document_in(
    State(state): State<AppState>,
    Path(folder_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Document>>), ApiError> {
    create(state, multipart, Some(folder_id)).await
}

async fn create(
    state: AppState,
    mut multipart: Multipart,
    folder_id: Option<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<Document>>), ApiError> {
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
            file = Some(UploadedFile::new(file_name, data));
        }
    }

    let file = file.ok_or_else(|| AppError::validation("file is required"))?;
    let document = state
        .document_service
        .create_document(file, folder_id)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(document))))
}

/// GET /api/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let document = state.document_service.get_document(id).await?;
    Ok(Json(ApiResponse::ok(document)))
}

/// PATCH /api/documents/{id}
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateDocumentRequest>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let document = state
        .document_service
        .update_document(
            id,
            SvcUpdateDocument {
                name: req.name,
                folder_id: req.folder_id,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(document)))
}

/// DELETE /api/documents/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.document_service.delete_document(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Document deleted"))))
}
