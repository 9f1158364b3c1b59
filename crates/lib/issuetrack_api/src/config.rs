//! API server configuration.

use std::fmt;
use std::path::PathBuf;

use issuetrack_core::auth::{DEFAULT_ACCESS_TOKEN_TTL_MINUTES, MAX_ACCESS_TOKEN_TTL_MINUTES};
use issuetrack_core::store::IssueStore;
use thiserror::Error;

/// Configuration errors. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("{var} must be an integer from 1 to {max}, got '{value}'", max = MAX_ACCESS_TOKEN_TTL_MINUTES)]
    InvalidNumber { var: &'static str, value: String },
}

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8000").
    pub bind_addr: String,
    /// JSON file holding the issue collection.
    pub issues_file: PathBuf,
    /// JWT signing secret. No default.
    pub jwt_secret: String,
    /// Lifetime of tokens issued at login.
    pub token_ttl_minutes: i64,
    /// JSON users file for the static directory. `None` means no users.
    pub users_file: Option<PathBuf>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("issues_file", &self.issues_file)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("users_file", &self.users_file)
            .finish()
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable                      | Default                              |
    /// |-------------------------------|--------------------------------------|
    /// | `BIND_ADDR`                   | `127.0.0.1:8000`                     |
    /// | `ISSUES_FILE`                 | `<data dir>/issuetrack/issues.json`  |
    /// | `JWT_SECRET`                  | required                             |
    /// | `ACCESS_TOKEN_EXPIRE_MINUTES` | `15`                                 |
    /// | `USERS_FILE`                  | unset                                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::MissingSecret)?;

        let token_ttl_minutes = match non_empty("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => parse_minutes("ACCESS_TOKEN_EXPIRE_MINUTES", &raw)?,
            None => DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
        };

        Ok(Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8000".into()),
            issues_file: non_empty("ISSUES_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(IssueStore::default_path),
            jwt_secret,
            token_ttl_minutes,
            users_file: non_empty("USERS_FILE").map(PathBuf::from),
        })
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_ttl_minutes)
    }
}

/// Parse a token lifetime in minutes, bounded to `1..=MAX_ACCESS_TOKEN_TTL_MINUTES`.
pub fn parse_minutes(var: &'static str, raw: &str) -> Result<i64, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if (1..=MAX_ACCESS_TOKEN_TTL_MINUTES).contains(&n) => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: raw.to_string(),
        }),
    }
}
