//! File upload, move, copy, and delete handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bytes::Bytes;
use uuid::Uuid;

use cove_core::error::AppError;

use crate::dto::request::{CopyFileRequest, MoveFileRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/files (multipart: optional `folder_id` text field, one
/// `file` field)
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut folder_id: Option<Uuid> = None;
    let mut upload: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("folder_id") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid folder_id field: {e}")))?;
                if !raw.is_empty() {
                    folder_id = Some(
                        raw.parse::<Uuid>()
                            .map_err(|_| AppError::validation("Invalid folder_id"))?,
                    );
                }
            }
            _ => {
                let Some(filename) = field.file_name().map(String::from) else {
                    continue;
                };
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read upload: {e}")))?;
                upload = Some((filename, content_type, data));
            }
        }
    }

    let (filename, content_type, data) =
        upload.ok_or_else(|| AppError::validation("Multipart body contains no file"))?;

    let file = state
        .namespace_service
        .upload_file(&auth, filename, content_type, data, folder_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(file))))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.namespace_service.delete_file(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("File deleted"))))
}

/// PUT /api/files/{id}/move
pub async fn move_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveFileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let file = state
        .namespace_service
        .move_file(&auth, id, req.target_folder_id)
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// POST /api/files/{id}/copy
pub async fn copy_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CopyFileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let file = state
        .namespace_service
        .copy_file(&auth, id, req.target_folder_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(file))))
}
