//! Share lifecycle and public validation handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use cove_service::share::CreateShareRequest as SvcCreateShare;

use crate::dto::request::CreateShareRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateShareRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .share_service
        .create_share(
            &auth,
            SvcCreateShare {
                file_id: req.file_id,
                folder_id: req.folder_id,
                share_type: req.share_type,
                permissions: req.permissions,
                expires_at: req.expires_at,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// GET /api/shares
pub async fn list_shares(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let shares = state.share_service.list_shares(&auth).await?;
    Ok(Json(ApiResponse::ok(shares)))
}

/// DELETE /api/shares/{id}
pub async fn deactivate_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.share_service.deactivate_share(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Share deactivated",
    ))))
}

/// GET /api/shares/{token} — public, no auth.
pub async fn validate_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state.share_access_service.validate(&token).await?;
    Ok(Json(ApiResponse::ok(view)))
}
