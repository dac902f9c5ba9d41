//! Folder and entry-listing handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;
use validator::Validate;

use cove_core::error::AppError;

use crate::dto::request::{CreateFolderRequest, EntryQuery, MoveFolderRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/entries?folder_id=...
pub async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<EntryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state
        .namespace_service
        .list_entries(&auth, query.folder_id)
        .await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// GET /api/folders/{id}/breadcrumbs
pub async fn breadcrumbs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let trail = state.namespace_service.breadcrumbs(&auth, id).await?;
    Ok(Json(ApiResponse::ok(trail)))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let folder = state
        .namespace_service
        .create_folder(&auth, req.name, req.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.namespace_service.delete_folder(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Folder deleted"))))
}

/// PUT /api/folders/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveFolderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let folder = state
        .namespace_service
        .move_folder(&auth, id, req.target_folder_id)
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}
