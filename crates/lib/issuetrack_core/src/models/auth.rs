//! Authentication domain models.
//!
//! These are internal domain models, distinct from the request/response
//! bodies in `issuetrack_api::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directory user, safe to hand across the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// User with password hash (for internal auth flows).
///
/// Deserializable so directory files can carry the hash, but never
/// serialized.
#[derive(Debug, Clone, Deserialize)]
pub struct UserWithPassword {
    #[serde(flatten)]
    pub user: User,
    /// bcrypt hash.
    pub hashed_password: String,
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the username (standard JWT `sub` claim).
    pub sub: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// A signed access token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub subject: String,
    pub expires_at: DateTime<Utc>,
}
