//! In-memory storage implementation.
//!
//! This backend stores all data in RAM using a HashMap, giving fast and
//! isolated test execution. It is `Send + Sync` so it can also back the
//! HTTP server directly when persistence is not needed.

use crate::domain::Issue;
use crate::storage::IssueStore;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory storage backend.
///
/// All data is lost when the last clone is dropped. Clones share the same
/// underlying map, mirroring how file-backed clones share a directory.
///
/// # Examples
///
/// ```
/// use tracker::storage::{InMemoryStorage, IssueStore};
/// use tracker::domain::Issue;
///
/// let storage = InMemoryStorage::new();
/// storage.init().unwrap();
///
/// let issue = Issue::new(
///     "apitest".to_string(),
///     "Test".to_string(),
///     "Description".to_string(),
///     "alice".to_string(),
/// );
/// storage.save_issue(&issue).unwrap();
///
/// let loaded = storage.load_issue(&issue.id).unwrap();
/// assert_eq!(loaded.issue_title, "Test");
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    issues: Arc<RwLock<HashMap<String, Issue>>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage instance.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IssueStore for InMemoryStorage {
    fn init(&self) -> Result<()> {
        // No initialization needed for in-memory storage
        Ok(())
    }

    fn save_issue(&self, issue: &Issue) -> Result<()> {
        self.issues
            .write()
            .map_err(|_| anyhow!("issue map lock poisoned"))?
            .insert(issue.id.clone(), issue.clone());
        Ok(())
    }

    fn load_issue(&self, id: &str) -> Result<Issue> {
        self.issues
            .read()
            .map_err(|_| anyhow!("issue map lock poisoned"))?
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("Issue not found: {}", id))
    }

    fn delete_issue(&self, id: &str) -> Result<()> {
        self.issues
            .write()
            .map_err(|_| anyhow!("issue map lock poisoned"))?
            .remove(id)
            .ok_or_else(|| anyhow!("Issue not found: {}", id))?;
        Ok(())
    }

    fn list_issues(&self) -> Result<Vec<Issue>> {
        Ok(self
            .issues
            .read()
            .map_err(|_| anyhow!("issue map lock poisoned"))?
            .values()
            .cloned()
            .collect())
    }
}
