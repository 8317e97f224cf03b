//! Issue Tracker REST API Server Library
//!
//! Provides the HTTP surface for the project-scoped issue store: CRUD
//! routes under `/api/issues/:project` plus the legacy project-less
//! create fallback.

pub mod routes;

// Re-export for convenience
pub use routes::create_routes;
