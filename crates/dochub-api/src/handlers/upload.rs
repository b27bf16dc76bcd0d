//! Streaming folder upload handlers.

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::Response;
use bytes::Bytes;
use futures::StreamExt;
use uuid::Uuid;

use dochub_core::error::AppError;
use dochub_service::{FolderUploadRequest, UploadedFile};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/folder-upload
pub async fn upload_folder(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    stream_upload(state, multipart, None).await
}

/// POST /api/folder-upload/{folder_id}
pub async fn upload_folder_into(
    State(state): State<AppState>,
    Path(folder_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    stream_upload(state, multipart, Some(folder_id)).await
}

/// Read the `paths`/`files` parts, then answer with one JSON line per
/// progress event, written as each event is produced.
async fn stream_upload(
    state: AppState,
    mut multipart: Multipart,
    folder_id: Option<Uuid>,
) -> Result<Response, ApiError> {
    let mut paths = Vec::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "paths" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                paths.push(text);
            }
            "files" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                files.push(UploadedFile::new(file_name, data));
            }
            _ => {}
        }
    }

    let request = FolderUploadRequest::new(paths, files, folder_id)?;
    let lines = state
        .upload_service
        .stream_progress(request)
        .map(|event| event.to_line().map(Bytes::from));

    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(lines))
        .map_err(|e| AppError::internal(format!("Failed to build response: {e}")).into())
}
