//! Request and response bodies.
//!
//! These are the wire shapes only; conversion into the core's domain types
//! happens here so handlers stay one-liners.

use issuetrack_core::models::issue::{IssuePatch, NewIssue, Priority, Status};
use serde::{Deserialize, Serialize};

/// `POST /api/v1/issues` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateIssueRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl From<CreateIssueRequest> for NewIssue {
    fn from(body: CreateIssueRequest) -> Self {
        NewIssue {
            title: body.title,
            description: body.description,
            priority: body.priority,
        }
    }
}

/// `PUT /api/v1/issues/{id}` body. Omitted and `null` fields both mean
/// "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateIssueRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl From<UpdateIssueRequest> for IssuePatch {
    fn from(body: UpdateIssueRequest) -> Self {
        IssuePatch {
            title: body.title,
            description: body.description,
            priority: body.priority,
            status: body.status,
        }
    }
}

/// Form-encoded login body. Extra OAuth2 password-flow fields such as
/// `grant_type` and `scope` are accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
