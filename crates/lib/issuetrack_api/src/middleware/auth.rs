//! Authentication middleware: bearer token extraction and principal resolution.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use issuetrack_core::auth::TokenAuthority;
use issuetrack_core::models::auth::User;

use crate::AppState;
use crate::error::AppError;

/// Active user resolved from the bearer token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies it,
/// resolves the user, refuses disabled accounts and injects
/// [`AuthenticatedUser`] into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

    let token = bearer_token(header)
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;

    let user = state.authority.resolve_principal(token).await?;
    let user = TokenAuthority::require_active(user)?;

    request.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(request).await)
}

/// The credentials of a `Bearer` authorization header. The scheme name is
/// case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
