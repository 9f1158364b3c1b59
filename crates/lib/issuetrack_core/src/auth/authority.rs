//! Credential & token authority.
//!
//! A request moves through `token presented → verified → principal resolved
//! → active`. Each step is one method here and any failure ends the chain;
//! nothing is retried.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::directory::UserDirectory;
use super::password::{hash_password, verify_password};
use super::{AuthError, jwt};
use crate::models::auth::{AccessToken, User};

/// Access token lifetime when the caller does not ask for one: 15 minutes.
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Longest configurable access token lifetime: ten years.
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: i64 = 525_600 * 10;

/// Compared against when the username is unknown, so both failure paths
/// pay for one bcrypt verification.
const TIMING_DUMMY_PASSWORD: &str = "issuetrack-timing-dummy";

pub struct TokenAuthority {
    directory: Arc<dyn UserDirectory>,
    secret: Vec<u8>,
    default_ttl: Duration,
    dummy_hash: String,
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenAuthority {
    /// Build an authority signing with `secret`. An empty secret is refused.
    pub fn new(
        secret: impl Into<Vec<u8>>,
        directory: Arc<dyn UserDirectory>,
    ) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AuthError::Internal("signing secret must not be empty".into()));
        }
        Ok(Self {
            directory,
            secret,
            default_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
            dummy_hash: hash_password(TIMING_DUMMY_PASSWORD)?,
        })
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Check a username/password pair against the directory.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Some(entry) = self.directory.find_user(username).await else {
            let _ = verify_password(password, &self.dummy_hash);
            debug!(username, "login for unknown user");
            return Err(AuthError::CredentialError);
        };

        if !verify_password(password, &entry.hashed_password) {
            debug!(username, "login with wrong password");
            return Err(AuthError::CredentialError);
        }
        Ok(entry.user)
    }

    /// Password login: authenticate, refuse disabled accounts, issue a token
    /// with the default lifetime.
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError> {
        let user = Self::require_active(self.authenticate(username, password).await?)?;
        self.issue_token(&user.username, None)
    }

    pub fn issue_token(&self, subject: &str, ttl: Option<Duration>) -> Result<AccessToken, AuthError> {
        self.issue_token_at(subject, ttl, Utc::now())
    }

    pub fn issue_token_at(
        &self,
        subject: &str,
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, AuthError> {
        jwt::generate_access_token(subject, ttl.unwrap_or(self.default_ttl), now, &self.secret)
    }

    /// Verify signature and expiry, returning the subject.
    pub fn verify_token(&self, token: &str) -> Result<String, AuthError> {
        self.verify_token_at(token, Utc::now())
    }

    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        jwt::verify_access_token(token, now, &self.secret).map(|claims| claims.sub)
    }

    /// Verify the token and look its subject up in the directory.
    pub async fn resolve_principal(&self, token: &str) -> Result<User, AuthError> {
        self.resolve_principal_at(token, Utc::now()).await
    }

    pub async fn resolve_principal_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<User, AuthError> {
        let subject = self.verify_token_at(token, now)?;
        match self.directory.find_user(&subject).await {
            Some(entry) => Ok(entry.user),
            None => {
                warn!(subject = %subject, "valid token for user no longer in directory");
                Err(AuthError::UnknownPrincipal)
            }
        }
    }

    pub fn require_active(user: User) -> Result<User, AuthError> {
        if user.disabled {
            return Err(AuthError::InactiveUser);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticUserDirectory;
    use crate::auth::password::hash_password_with_cost;
    use crate::models::auth::UserWithPassword;

    fn user(username: &str, password: &str, disabled: bool) -> UserWithPassword {
        UserWithPassword {
            user: User {
                username: username.into(),
                email: Some(format!("{username}@example.com")),
                full_name: None,
                disabled,
            },
            hashed_password: hash_password_with_cost(password, 4).unwrap(),
        }
    }

    fn authority() -> TokenAuthority {
        let directory = StaticUserDirectory::new([
            user("johndoe", "secret", false),
            user("alice", "wonderland", true),
        ])
        .unwrap();
        TokenAuthority::new("test-secret", Arc::new(directory)).unwrap()
    }

    #[tokio::test]
    async fn authenticate_accepts_correct_password() {
        let user = authority().authenticate("johndoe", "secret").await.unwrap();
        assert_eq!(user.username, "johndoe");
        assert!(!user.disabled);
    }

    #[tokio::test]
    async fn authenticate_rejects_wrong_password_and_unknown_user_alike() {
        let auth = authority();
        let wrong = auth.authenticate("johndoe", "wrong").await.unwrap_err();
        let unknown = auth.authenticate("nobody", "secret").await.unwrap_err();
        assert!(matches!(wrong, AuthError::CredentialError));
        assert!(matches!(unknown, AuthError::CredentialError));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn login_issues_token_for_active_user() {
        let auth = authority();
        let token = auth.login("johndoe", "secret").await.unwrap();
        assert_eq!(auth.verify_token(&token.token).unwrap(), "johndoe");
        let lifetime = token.expires_at - Utc::now();
        assert!(lifetime <= Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES));
        assert!(lifetime > Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES - 1));
    }

    #[tokio::test]
    async fn login_refuses_disabled_user() {
        let err = authority().login("alice", "wonderland").await.unwrap_err();
        assert!(matches!(err, AuthError::InactiveUser));
    }

    #[test]
    fn token_expires_after_ttl_on_simulated_clock() {
        let auth = authority();
        let issued = Utc::now();
        let token = auth
            .issue_token_at("johndoe", Some(Duration::minutes(30)), issued)
            .unwrap();
        assert_eq!(
            auth.verify_token_at(&token.token, issued + Duration::minutes(29)).unwrap(),
            "johndoe"
        );
        assert!(matches!(
            auth.verify_token_at(&token.token, issued + Duration::minutes(31)),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn default_ttl_is_configurable() {
        let auth = authority().with_default_ttl(Duration::minutes(1));
        let issued = Utc::now();
        let token = auth.issue_token_at("johndoe", None, issued).unwrap();
        assert_eq!(token.expires_at, issued + Duration::minutes(1));
        assert!(auth.verify_token_at(&token.token, issued + Duration::minutes(2)).is_err());
    }

    #[tokio::test]
    async fn login_with_unrepresentable_ttl_fails_without_panicking() {
        let auth = authority().with_default_ttl(Duration::minutes(1_000_000_000_000));
        assert!(matches!(
            auth.login("johndoe", "secret").await,
            Err(AuthError::Internal(_))
        ));
    }

    #[test]
    fn longest_configurable_ttl_issues_a_token() {
        let auth = authority().with_default_ttl(Duration::minutes(MAX_ACCESS_TOKEN_TTL_MINUTES));
        let issued = Utc::now();
        let token = auth.issue_token_at("johndoe", None, issued).unwrap();
        assert_eq!(auth.verify_token_at(&token.token, issued).unwrap(), "johndoe");
    }

    #[tokio::test]
    async fn resolve_principal_returns_directory_user() {
        let auth = authority();
        let token = auth.issue_token("johndoe", None).unwrap();
        let user = auth.resolve_principal(&token.token).await.unwrap();
        assert_eq!(user.email.as_deref(), Some("johndoe@example.com"));
    }

    #[tokio::test]
    async fn resolve_principal_rejects_vanished_subject() {
        let auth = authority();
        let token = auth.issue_token("ghost", None).unwrap();
        assert!(matches!(
            auth.resolve_principal(&token.token).await,
            Err(AuthError::UnknownPrincipal)
        ));
    }

    #[tokio::test]
    async fn resolve_principal_rejects_foreign_signature() {
        let other = TokenAuthority::new(
            "other-secret",
            Arc::new(StaticUserDirectory::default()),
        )
        .unwrap();
        let token = other.issue_token("johndoe", None).unwrap();
        assert!(matches!(
            authority().resolve_principal(&token.token).await,
            Err(AuthError::TokenError(_))
        ));
    }

    #[test]
    fn require_active_gates_disabled_users() {
        let active = User {
            username: "johndoe".into(),
            email: None,
            full_name: None,
            disabled: false,
        };
        let disabled = User {
            disabled: true,
            ..active.clone()
        };
        assert_eq!(TokenAuthority::require_active(active.clone()).unwrap(), active);
        assert!(matches!(
            TokenAuthority::require_active(disabled),
            Err(AuthError::InactiveUser)
        ));
    }

    #[test]
    fn empty_secret_is_refused() {
        let err = TokenAuthority::new("", Arc::new(StaticUserDirectory::default())).unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
