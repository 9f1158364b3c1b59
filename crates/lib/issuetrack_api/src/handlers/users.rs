//! Current-user handler.

use axum::Json;
use issuetrack_core::models::auth::User;

use crate::middleware::auth::AuthenticatedUser;

/// `GET /api/v1/users/me`: the active user behind the bearer token.
pub async fn me_handler(
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> Json<User> {
    Json(user.0)
}
