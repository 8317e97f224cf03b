//! Storage abstraction layer for persisting issues.
//!
//! This module defines the `IssueStore` trait that abstracts storage
//! operations, allowing different backends (JSON files, in-memory, etc.)
//! to be used interchangeably.

use crate::domain::Issue;
use anyhow::Result;

pub mod json;
pub mod memory;

// Re-export for convenience
pub use json::JsonFileStorage;
pub use memory::InMemoryStorage;

/// Trait for storage backends that persist issues.
///
/// Implementations must be `Clone` to support shared access patterns.
/// Each method is a single-record operation; the backend guarantees
/// atomicity per record, nothing across records.
///
/// # Examples
///
/// ```
/// use tracker::domain::Issue;
/// use tracker::storage::{InMemoryStorage, IssueStore};
///
/// let storage = InMemoryStorage::new();
/// storage.init().unwrap();
///
/// let issue = Issue::new(
///     "apitest".to_string(),
///     "Fix bug".to_string(),
///     "Details".to_string(),
///     "alice".to_string(),
/// );
/// storage.save_issue(&issue).unwrap();
///
/// let loaded = storage.load_issue(&issue.id).unwrap();
/// assert_eq!(loaded.issue_title, "Fix bug");
/// ```
pub trait IssueStore: Clone {
    /// Initialize the storage backend (idempotent).
    ///
    /// Creates necessary directories or files.
    fn init(&self) -> Result<()>;

    /// Save an issue (create or overwrite by id).
    ///
    /// # Errors
    ///
    /// Returns an error if the issue cannot be serialized or persisted.
    fn save_issue(&self, issue: &Issue) -> Result<()>;

    /// Load an issue by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue does not exist or cannot be
    /// deserialized. Callers implementing the API contract collapse both
    /// cases into "not found".
    fn load_issue(&self, id: &str) -> Result<Issue>;

    /// Delete an issue by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue does not exist or cannot be deleted.
    fn delete_issue(&self, id: &str) -> Result<()>;

    /// List all issues across every project.
    ///
    /// # Errors
    ///
    /// Returns an error if issues cannot be loaded.
    fn list_issues(&self) -> Result<Vec<Issue>>;

    /// List all issues belonging to the given project.
    ///
    /// # Errors
    ///
    /// Returns an error if issues cannot be loaded.
    fn list_project_issues(&self, project: &str) -> Result<Vec<Issue>> {
        let mut issues = self.list_issues()?;
        issues.retain(|issue| issue.project_name == project);
        Ok(issues)
    }
}
