//! Authentication logic.
//!
//! Provides password hashing, JWT management, the user directory seam and
//! the [`TokenAuthority`] that composes them.

pub mod authority;
pub mod directory;
pub mod jwt;
pub mod password;

pub use authority::{
    DEFAULT_ACCESS_TOKEN_TTL_MINUTES, MAX_ACCESS_TOKEN_TTL_MINUTES, TokenAuthority,
};
pub use directory::{StaticUserDirectory, UserDirectory};

use thiserror::Error;

/// Authentication errors.
///
/// Every variant is an authentication failure at the boundary except
/// `Internal`, which signals a fault in hashing or signing.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("Invalid credentials")]
    CredentialError,

    /// Bad signature, malformed payload or missing subject.
    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Token expired")]
    TokenExpired,

    /// Token verified but its subject is not in the directory.
    #[error("Unknown principal")]
    UnknownPrincipal,

    #[error("Inactive user")]
    InactiveUser,

    #[error("Internal error: {0}")]
    Internal(String),
}
