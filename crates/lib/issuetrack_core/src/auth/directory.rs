//! User directory seam.
//!
//! The token authority only ever reads users through [`UserDirectory`], so a
//! persistent directory can replace the static one without touching the
//! authentication logic.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::models::auth::UserWithPassword;

/// Read-only username lookup.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, username: &str) -> Option<UserWithPassword>;
}

/// Errors raised while building a directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("read users file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse users file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate username: {0}")]
    DuplicateUser(String),
}

/// In-memory directory fixed at construction time.
#[derive(Debug, Default, Clone)]
pub struct StaticUserDirectory {
    users: HashMap<String, UserWithPassword>,
}

impl StaticUserDirectory {
    pub fn new(users: impl IntoIterator<Item = UserWithPassword>) -> Result<Self, DirectoryError> {
        let mut map = HashMap::new();
        for entry in users {
            let username = entry.user.username.clone();
            if map.insert(username.clone(), entry).is_some() {
                return Err(DirectoryError::DuplicateUser(username));
            }
        }
        Ok(Self { users: map })
    }

    /// Load a JSON array of users, each carrying a bcrypt `hashed_password`.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let raw = std::fs::read_to_string(path)?;
        let users: Vec<UserWithPassword> = serde_json::from_str(&raw)?;
        let directory = Self::new(users)?;
        info!(path = %path.display(), users = directory.len(), "loaded user directory");
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn find_user(&self, username: &str) -> Option<UserWithPassword> {
        self.users.get(username).cloned()
    }
}
