//! Redemption of locally minted signed download URLs.
//!
//! The local object store signs `{object_base_url}/download?token=...`
//! URLs; this handler verifies the token and streams the object back.
//! S3 deployments presign directly against the bucket and never hit
//! this route.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;

use cove_core::error::AppError;
use cove_core::traits::ObjectStore;
use cove_storage::decode_download_token;

use crate::dto::request::DownloadQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /download?token=...
pub async fn redeem(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let secret = &state.config.storage.local.url_signing_secret;
    if secret.is_empty() {
        return Err(ApiError(AppError::not_found(
            "Download links are not served by this deployment",
        )));
    }

    let claims = decode_download_token(secret, &query.token)?;
    let data = state.objects.read_bytes(&claims.sub).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", claims.filename),
            ),
        ],
        data,
    ))
}
