//! Signed download URL handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use uuid::Uuid;

use cove_core::error::AppError;
use cove_service::RequestContext;

use crate::dto::request::{SignedUrlQuery, SignedUrlRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, client_info};
use crate::state::AppState;

/// GET /api/signed-url?file_id=... — owner mode.
pub async fn issue_for_owner(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SignedUrlQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let issued = state
        .signed_url_service
        .issue_for_owner(&auth, query.file_id)
        .await?;
    Ok(Json(ApiResponse::ok(issued)))
}

/// POST /api/signed-url — dual mode.
///
/// `{file_id}` with a bearer token issues as the owner; `{share_token,
/// file_path?}` issues on behalf of a share and needs no bearer token.
pub async fn issue(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    headers: HeaderMap,
    Json(req): Json<SignedUrlRequest>,
) -> Result<impl IntoResponse, ApiError> {
    match (req.file_id, req.share_token) {
        (Some(_), Some(_)) => Err(ApiError(AppError::validation(
            "Provide either file_id or share_token, not both",
        ))),
        (Some(file_id), None) => {
            let auth = auth
                .ok_or_else(|| ApiError(AppError::authentication("Missing bearer token")))?;
            let issued = state
                .signed_url_service
                .issue_for_owner(&auth, file_id)
                .await?;
            Ok(Json(ApiResponse::ok(serde_json::json!(issued))))
        }
        (None, Some(token)) => {
            let (ip_address, user_agent) = client_info(&headers);
            // Share-mode requests are anonymous; the audit entry carries
            // no user id either way.
            let ctx = RequestContext::new(Uuid::nil(), ip_address, user_agent);
            let issued = state
                .signed_url_service
                .issue_for_share(&ctx, &token, req.file_path.as_deref())
                .await?;
            Ok(Json(ApiResponse::ok(serde_json::json!(issued))))
        }
        (None, None) => Err(ApiError(AppError::validation(
            "Provide file_id or share_token",
        ))),
    }
}
