//! Core domain types for the issue store.
//!
//! The wire contract is fixed: field names below (including the `_id`
//! rename) are what clients see in every JSON response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An issue scoped to a named project.
///
/// Projects are plain strings, not stored entities; an issue belongs to
/// exactly one project for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier (UUID), generated at creation, immutable
    #[serde(rename = "_id")]
    pub id: String,
    /// Short summary, never empty on a stored issue
    pub issue_title: String,
    /// Detailed description, never empty on a stored issue
    pub issue_text: String,
    /// Author, never empty on a stored issue
    pub created_by: String,
    /// Assignee, empty string when unassigned
    pub assigned_to: String,
    /// Free-form status note, empty string by default
    pub status_text: String,
    /// Whether the issue is still open
    pub open: bool,
    /// Set once at creation
    pub created_on: DateTime<Utc>,
    /// Refreshed on every successful update; always >= `created_on`
    pub updated_on: DateTime<Utc>,
    /// Name of the project this issue belongs to
    pub project_name: String,
}

impl Issue {
    /// Create a new open issue with both timestamps set to now.
    pub fn new(
        project_name: String,
        issue_title: String,
        issue_text: String,
        created_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            issue_title,
            issue_text,
            created_by,
            assigned_to: String::new(),
            status_text: String::new(),
            open: true,
            created_on: now,
            updated_on: now,
            project_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_issue_defaults() {
        let issue = Issue::new(
            "apitest".to_string(),
            "Title".to_string(),
            "Text".to_string(),
            "alice".to_string(),
        );

        assert!(issue.open);
        assert_eq!(issue.assigned_to, "");
        assert_eq!(issue.status_text, "");
        assert_eq!(issue.project_name, "apitest");
        assert_eq!(issue.created_on, issue.updated_on);
        assert!(!issue.id.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Issue::new("p".into(), "t".into(), "x".into(), "c".into());
        let b = Issue::new("p".into(), "t".into(), "x".into(), "c".into());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serializes_id_as_underscore_id() {
        let issue = Issue::new(
            "apitest".to_string(),
            "Title".to_string(),
            "Text".to_string(),
            "alice".to_string(),
        );

        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["_id"], serde_json::json!(issue.id));
        assert!(value.get("id").is_none());
        assert_eq!(value["open"], serde_json::json!(true));
    }

    #[test]
    fn test_roundtrips_through_json() {
        let issue = Issue::new(
            "apitest".to_string(),
            "Title".to_string(),
            "Text".to_string(),
            "alice".to_string(),
        );

        let json = serde_json::to_string(&issue).unwrap();
        let back: Issue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, issue);
    }
}
