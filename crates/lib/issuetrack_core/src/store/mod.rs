//! File-backed issue store.
//!
//! The JSON file is the only source of truth and is reloaded on every call,
//! so edits made by other processes and restarts are picked up without any
//! cache invalidation. Mutations hold the write half of a per-store lock
//! across the whole load-modify-save sequence; reads share the read half.

mod document;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::issue::{Issue, IssuePatch, NewIssue, Status, ValidationError};

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Issue not found: {0}")]
    NotFound(String),

    /// A freshly generated id matched an existing record. Nothing was written.
    #[error("Issue id collision: {0}")]
    Conflict(String),

    #[error("Storage I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable issues file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl StoreError {
    /// True for failures of the backing file rather than of the request.
    pub fn is_storage(&self) -> bool {
        matches!(self, StoreError::Io(_) | StoreError::Corrupt { .. })
    }
}

/// Durable CRUD over the issue collection.
#[derive(Debug)]
pub struct IssueStore {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl IssueStore {
    /// Bind a store to `path`. Nothing is read or created until first use.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(RwLock::new(())),
        }
    }

    /// `<data dir>/issuetrack/issues.json`.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("issuetrack")
            .join("issues.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All issues in insertion order.
    pub async fn list_issues(&self) -> Result<Vec<Issue>, StoreError> {
        let _guard = self.lock.read().await;
        document::load(&self.path).await
    }

    pub async fn get_issue(&self, id: &str) -> Result<Issue, StoreError> {
        let _guard = self.lock.read().await;
        document::load(&self.path)
            .await?
            .into_iter()
            .find(|issue| issue.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Validate, assign a fresh id, force `status = open`, append and persist.
    pub async fn create_issue(&self, new: NewIssue) -> Result<Issue, StoreError> {
        self.create_issue_with_id(new, Uuid::new_v4().to_string())
            .await
    }

    async fn create_issue_with_id(&self, new: NewIssue, id: String) -> Result<Issue, StoreError> {
        new.validate()?;
        let issue = Issue {
            id,
            title: new.title,
            description: new.description,
            priority: new.priority.unwrap_or_default(),
            status: Status::Open,
        };

        let created = self
            .mutate(move |issues| {
                if issues.iter().any(|existing| existing.id == issue.id) {
                    error!(id = %issue.id, "generated issue id collides with an existing record");
                    return Err(StoreError::Conflict(issue.id));
                }
                issues.push(issue.clone());
                Ok(issue)
            })
            .await?;

        info!(id = %created.id, priority = %created.priority, "issue created");
        Ok(created)
    }

    /// Apply the fields present in `patch`; absent fields are left untouched.
    /// An empty patch only reads.
    pub async fn update_issue(&self, id: &str, patch: IssuePatch) -> Result<Issue, StoreError> {
        patch.validate()?;
        if patch.is_empty() {
            return self.get_issue(id).await;
        }
        let updated = self
            .mutate(|issues| {
                let issue = issues
                    .iter_mut()
                    .find(|issue| issue.id == id)
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                patch.apply_to(issue);
                Ok(issue.clone())
            })
            .await?;

        info!(id = %updated.id, status = %updated.status, "issue updated");
        Ok(updated)
    }

    /// Remove permanently.
    pub async fn delete_issue(&self, id: &str) -> Result<(), StoreError> {
        self.mutate(|issues| {
            let index = issues
                .iter()
                .position(|issue| issue.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            issues.remove(index);
            Ok(())
        })
        .await?;

        info!(id, "issue deleted");
        Ok(())
    }

    /// Load → mutate → save under the write lock. Nothing is written when
    /// `operation` fails.
    ///
    /// The guard travels into the blocking write, so it is only released once
    /// the file is in place even if the calling future is dropped mid-write.
    async fn mutate<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Vec<Issue>) -> Result<T, StoreError>,
    {
        let guard = Arc::clone(&self.lock).write_owned().await;
        let mut issues = document::load(&self.path).await?;
        let result = operation(&mut issues)?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            document::save(&path, &issues)
        })
        .await
        .map_err(|e| StoreError::Io(std::io::Error::other(e)))??;
        Ok(result)
    }
}
