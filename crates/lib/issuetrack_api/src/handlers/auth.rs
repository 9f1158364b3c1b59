//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use tracing::info;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppForm;
use crate::models::{LoginRequest, TokenResponse};

/// `POST /api/v1/auth/token`: exchange form-encoded username + password
/// for a bearer token.
pub async fn login_handler(
    State(state): State<AppState>,
    AppForm(body): AppForm<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.authority.login(&body.username, &body.password).await?;
    info!(username = %token.subject, expires_at = %token.expires_at, "access token issued");
    Ok(Json(TokenResponse::bearer(token.token)))
}
