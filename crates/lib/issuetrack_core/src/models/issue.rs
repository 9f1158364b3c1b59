//! Issue domain model and field validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title length bounds, in characters.
pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;

/// Description length bounds, in characters.
pub const DESCRIPTION_MIN_CHARS: usize = 5;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

/// A field constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human readable rule that was violated.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Issue priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ValidationError::new(
                "priority",
                format!("unknown priority '{other}' (expected low, medium or high)"),
            )),
        }
    }
}

/// Issue lifecycle status.
///
/// `in progress` (with a space) is accepted on read for documents written
/// before the snake_case spelling was adopted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    #[serde(alias = "in progress")]
    InProgress,
    Closed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Closed => "closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Status::Open),
            "in_progress" | "in progress" => Ok(Status::InProgress),
            "closed" => Ok(Status::Closed),
            other => Err(ValidationError::new(
                "status",
                format!("unknown status '{other}' (expected open, in_progress or closed)"),
            )),
        }
    }
}

/// A persisted issue record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
}

/// Input for creating an issue. The store assigns `id` and `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub priority: Option<Priority>,
}

impl NewIssue {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }
}

/// Partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

impl IssuePatch {
    /// Validate only the fields the patch actually sets.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }

    /// Overwrite the fields of `issue` that this patch sets.
    pub fn apply_to(self, issue: &mut Issue) {
        if let Some(title) = self.title {
            issue.title = title;
        }
        if let Some(description) = self.description {
            issue.description = description;
        }
        if let Some(priority) = self.priority {
            issue.priority = priority;
        }
        if let Some(status) = self.status {
            issue.status = status;
        }
    }
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    check_length("title", title, TITLE_MIN_CHARS, TITLE_MAX_CHARS)
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    check_length(
        "description",
        description,
        DESCRIPTION_MIN_CHARS,
        DESCRIPTION_MAX_CHARS,
    )
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new(
            field,
            format!("must be at least {min} characters"),
        ));
    }
    if len > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_issue() -> Issue {
        Issue {
            id: "abc".into(),
            title: "A title".into(),
            description: "A description".into(),
            priority: Priority::Low,
            status: Status::Open,
        }
    }

    #[test]
    fn title_length_two_is_rejected() {
        let err = validate_title("ab").unwrap_err();
        assert_eq!(err.field, "title");
        assert!(err.message.contains("at least 3"));
    }

    #[test]
    fn title_length_three_is_accepted() {
        assert!(validate_title("abc").is_ok());
    }

    #[test]
    fn title_upper_bound() {
        assert!(validate_title(&"x".repeat(TITLE_MAX_CHARS)).is_ok());
        let err = validate_title(&"x".repeat(TITLE_MAX_CHARS + 1)).unwrap_err();
        assert!(err.message.contains("at most 100"));
    }

    #[test]
    fn description_bounds() {
        assert!(validate_description("1234").is_err());
        assert!(validate_description("12345").is_ok());
        assert!(validate_description(&"y".repeat(DESCRIPTION_MAX_CHARS)).is_ok());
        assert!(validate_description(&"y".repeat(DESCRIPTION_MAX_CHARS + 1)).is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // three characters, six bytes
        assert!(validate_title("äöü").is_ok());
        assert!(validate_title("日本").is_err());
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn enums_serialize_as_snake_case() {
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), "high");
        assert_eq!(serde_json::to_value(Status::InProgress).unwrap(), "in_progress");
    }

    #[test]
    fn status_accepts_legacy_spelling() {
        let status: Status = serde_json::from_str("\"in progress\"").unwrap();
        assert_eq!(status, Status::InProgress);
        assert_eq!("in progress".parse::<Status>().unwrap(), Status::InProgress);
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
        assert!(serde_json::from_str::<Status>("\"OPEN\"").is_err());
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.field, "priority");
    }

    #[test]
    fn patch_validates_only_present_fields() {
        let patch = IssuePatch {
            description: Some("long enough".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());

        let patch = IssuePatch {
            title: Some("no".into()),
            ..Default::default()
        };
        assert_eq!(patch.validate().unwrap_err().field, "title");
    }

    #[test]
    fn patch_preserves_untouched_fields() {
        let mut issue = sample_issue();
        IssuePatch {
            description: Some("C changed".into()),
            ..Default::default()
        }
        .apply_to(&mut issue);
        assert_eq!(issue.title, "A title");
        assert_eq!(issue.description, "C changed");
        assert_eq!(issue.priority, Priority::Low);
        assert_eq!(issue.status, Status::Open);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(IssuePatch::default().is_empty());
        let patch = IssuePatch {
            status: Some(Status::Closed),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
