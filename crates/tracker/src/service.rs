//! CRUD operations implementing the public API contract.
//!
//! The `IssueService` holds the storage backend and carries out the four
//! operations (create, list/filter, update, delete). Logical failures are
//! reported as outcome enums rather than errors: the HTTP layer maps them
//! to structured payloads with status 200. Only unexpected persistence
//! failures during create or list surface as `anyhow::Error`; during
//! update and delete they are collapsed into the not-found outcome, per
//! the contract.

use crate::domain::Issue;
use crate::storage::IssueStore;
use anyhow::Result;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;

/// Project name used when the legacy route omits the path segment.
pub const DEFAULT_PROJECT: &str = "apitest";

/// Fields accepted when creating an issue.
///
/// All fields are optional at the wire level; `create_issue` rejects
/// drafts whose required fields are missing or empty.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct IssueDraft {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
}

/// The subset of fields an update may touch.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct IssuePatch {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
}

impl IssuePatch {
    /// True when no field carries a non-empty value.
    ///
    /// Empty strings count as absent: a field explicitly set to `""` is
    /// dropped from the patch rather than clearing the stored value. This
    /// mirrors the behavior clients already depend on.
    pub fn is_empty(&self) -> bool {
        ![
            &self.issue_title,
            &self.issue_text,
            &self.created_by,
            &self.assigned_to,
            &self.status_text,
        ]
        .into_iter()
        .any(is_set)
    }

    /// Copy every non-empty field onto the issue.
    fn apply(&self, issue: &mut Issue) {
        if let Some(v) = self.issue_title.as_ref().filter(|v| !v.is_empty()) {
            issue.issue_title = v.clone();
        }
        if let Some(v) = self.issue_text.as_ref().filter(|v| !v.is_empty()) {
            issue.issue_text = v.clone();
        }
        if let Some(v) = self.created_by.as_ref().filter(|v| !v.is_empty()) {
            issue.created_by = v.clone();
        }
        if let Some(v) = self.assigned_to.as_ref().filter(|v| !v.is_empty()) {
            issue.assigned_to = v.clone();
        }
        if let Some(v) = self.status_text.as_ref().filter(|v| !v.is_empty()) {
            issue.status_text = v.clone();
        }
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|v| !v.is_empty())
}

/// Result of a create attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Issue was persisted; carries the full stored record
    Created(Issue),
    /// A required field was missing or empty; nothing persisted
    MissingFields,
}

/// Result of an update attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// No non-empty updatable field was supplied
    NoFields,
    /// No record matched the id, or the backend failed
    NotFound,
}

/// Result of a delete attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// No record matched the id, or the backend failed
    NotFound,
}

/// Executes the CRUD operations over a storage backend.
///
/// Generic over storage to support different backends (JSON files,
/// in-memory, etc.).
pub struct IssueService<S: IssueStore> {
    storage: S,
    default_project: String,
}

impl<S: IssueStore> IssueService<S> {
    /// Create a new service with the given storage and the stock default
    /// project name.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            default_project: DEFAULT_PROJECT.to_string(),
        }
    }

    /// Override the project name used when the route omits one.
    pub fn with_default_project(mut self, name: impl Into<String>) -> Self {
        self.default_project = name.into();
        self
    }

    /// Initialize the underlying storage (idempotent).
    pub fn init(&self) -> Result<()> {
        self.storage.init()
    }

    /// Create a new issue under the given project.
    ///
    /// `project` is `None` only on the legacy project-less route, where
    /// the configured default project name applies. An empty path segment
    /// is treated the same way.
    pub fn create_issue(&self, project: Option<&str>, draft: IssueDraft) -> Result<CreateOutcome> {
        let project = match project {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => self.default_project.clone(),
        };

        let IssueDraft {
            issue_title,
            issue_text,
            created_by,
            assigned_to,
            status_text,
        } = draft;

        let (title, text, author) = match (issue_title, issue_text, created_by) {
            (Some(t), Some(x), Some(c)) if !t.is_empty() && !x.is_empty() && !c.is_empty() => {
                (t, x, c)
            }
            _ => return Ok(CreateOutcome::MissingFields),
        };

        let mut issue = Issue::new(project, title, text, author);
        issue.assigned_to = assigned_to.unwrap_or_default();
        issue.status_text = status_text.unwrap_or_default();

        self.storage.save_issue(&issue)?;
        Ok(CreateOutcome::Created(issue))
    }

    /// List a project's issues, narrowed by the given filters.
    ///
    /// Each filter key names a serialized field; an issue is kept when
    /// every filter value matches that field's text case-insensitively.
    /// Keys naming no field on the record match vacuously.
    pub fn list_issues(
        &self,
        project: &str,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<Issue>> {
        let mut issues = self.storage.list_project_issues(project)?;
        if !filters.is_empty() {
            issues.retain(|issue| matches_filters(issue, filters));
        }
        Ok(issues)
    }

    /// Apply a partial update to the issue with the given id.
    ///
    /// Non-empty patch fields overwrite the stored values and `updated_on`
    /// is bumped. Any storage failure (unknown id, malformed id, I/O)
    /// collapses into `NotFound`.
    pub fn update_issue(&self, id: &str, patch: &IssuePatch) -> UpdateOutcome {
        if patch.is_empty() {
            return UpdateOutcome::NoFields;
        }

        let mut issue = match self.storage.load_issue(id) {
            Ok(issue) => issue,
            Err(_) => return UpdateOutcome::NotFound,
        };

        patch.apply(&mut issue);
        issue.updated_on = Utc::now();

        match self.storage.save_issue(&issue) {
            Ok(()) => UpdateOutcome::Updated,
            Err(_) => UpdateOutcome::NotFound,
        }
    }

    /// Remove the issue with the given id.
    ///
    /// Any storage failure collapses into `NotFound`.
    pub fn delete_issue(&self, id: &str) -> DeleteOutcome {
        match self.storage.delete_issue(id) {
            Ok(()) => DeleteOutcome::Deleted,
            Err(_) => DeleteOutcome::NotFound,
        }
    }
}

/// True when every filter key either matches the issue's serialized field
/// case-insensitively or names no field at all.
fn matches_filters(issue: &Issue, filters: &HashMap<String, String>) -> bool {
    let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(issue) else {
        return true;
    };

    filters.iter().all(|(key, wanted)| match fields.get(key) {
        Some(value) => value_text(value).to_lowercase() == wanted.to_lowercase(),
        None => true,
    })
}

/// Render a serialized field as the text a query parameter is compared
/// against: strings verbatim, everything else via its JSON text.
fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
