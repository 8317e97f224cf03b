//! Issue Store Library
//!
//! This library provides the core functionality for the project-scoped
//! issue tracker: the issue domain model, pluggable storage backends, and
//! the CRUD service that implements the public API contract.

pub mod config;
pub mod domain;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use config::TrackerConfig;
pub use domain::Issue;
pub use service::{
    CreateOutcome, DeleteOutcome, IssueDraft, IssuePatch, IssueService, UpdateOutcome,
};
pub use storage::{InMemoryStorage, IssueStore, JsonFileStorage};
