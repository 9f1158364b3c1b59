//! Issue CRUD request handlers. All routes here sit behind `require_auth`.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use issuetrack_core::models::issue::Issue;
use tracing::debug;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreateIssueRequest, UpdateIssueRequest};

/// `GET /api/v1/issues` — all issues in insertion order.
pub async fn list_issues_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Issue>>> {
    let issues = state.store.list_issues().await?;
    Ok(Json(issues))
}

/// `POST /api/v1/issues` — create an issue (status is always `open`).
pub async fn create_issue_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    AppJson(body): AppJson<CreateIssueRequest>,
) -> AppResult<(StatusCode, Json<Issue>)> {
    let issue = state.store.create_issue(body.into()).await?;
    debug!(id = %issue.id, username = %user.0.username, "create issue");
    Ok((StatusCode::CREATED, Json(issue)))
}

/// `GET /api/v1/issues/{id}`
pub async fn get_issue_handler(
    State(state): State<AppState>,
    Path(issue_id): Path<String>,
) -> AppResult<Json<Issue>> {
    let issue = state.store.get_issue(&issue_id).await?;
    Ok(Json(issue))
}

/// `PUT /api/v1/issues/{id}` — partial update; omitted fields are kept.
pub async fn update_issue_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(issue_id): Path<String>,
    AppJson(body): AppJson<UpdateIssueRequest>,
) -> AppResult<Json<Issue>> {
    let issue = state.store.update_issue(&issue_id, body.into()).await?;
    debug!(id = %issue.id, username = %user.0.username, "update issue");
    Ok(Json(issue))
}

/// `DELETE /api/v1/issues/{id}` — 204 on success.
pub async fn delete_issue_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Path(issue_id): Path<String>,
) -> AppResult<StatusCode> {
    state.store.delete_issue(&issue_id).await?;
    debug!(id = %issue_id, username = %user.0.username, "delete issue");
    Ok(StatusCode::NO_CONTENT)
}
