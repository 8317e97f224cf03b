//! API route definitions
//!
//! Every issue operation answers HTTP 200 whether it logically succeeds
//! or fails; failure is signaled by an `error` key in the JSON payload.
//! Only unexpected persistence failures fall back to status 500.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use tracker::domain::Issue;
use tracker::service::{CreateOutcome, DeleteOutcome, IssueDraft, IssuePatch, UpdateOutcome};
use tracker::storage::IssueStore;
use tracker::IssueService;

/// Shared application state
pub type AppState<S> = Arc<IssueService<S>>;

/// Create API routes
pub fn create_routes<S: IssueStore + Send + Sync + 'static>(
    service: Arc<IssueService<S>>,
) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/issues/:project",
            get(list_issues)
                .post(create_issue)
                .put(update_issue)
                .delete(delete_issue),
        )
        // Legacy fallback create routes, with and without a project segment
        .route("/:project", post(create_issue))
        .route("/", post(create_issue_default))
        .with_state(service)
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "tracker-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create an issue under the project named in the path
async fn create_issue<S: IssueStore>(
    Path(project): Path<String>,
    State(service): State<AppState<S>>,
    body: Option<Json<IssueDraft>>,
) -> Result<Json<Value>, StatusCode> {
    create_response(&service, Some(&project), body)
}

/// Create an issue with no project segment (configured default applies)
async fn create_issue_default<S: IssueStore>(
    State(service): State<AppState<S>>,
    body: Option<Json<IssueDraft>>,
) -> Result<Json<Value>, StatusCode> {
    create_response(&service, None, body)
}

fn create_response<S: IssueStore>(
    service: &IssueService<S>,
    project: Option<&str>,
    body: Option<Json<IssueDraft>>,
) -> Result<Json<Value>, StatusCode> {
    let draft = body.map(|Json(draft)| draft).unwrap_or_default();

    match service.create_issue(project, draft) {
        Ok(CreateOutcome::Created(issue)) => {
            let value = serde_json::to_value(&issue).map_err(|e| {
                tracing::error!("Failed to serialize issue: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            Ok(Json(value))
        }
        Ok(CreateOutcome::MissingFields) => Ok(Json(json!({"error": "required field(s) missing"}))),
        Err(e) => {
            tracing::error!("Failed to create issue: {:?}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List a project's issues, narrowed by arbitrary query-string filters
async fn list_issues<S: IssueStore>(
    Path(project): Path<String>,
    Query(filters): Query<HashMap<String, String>>,
    State(service): State<AppState<S>>,
) -> Result<Json<Vec<Issue>>, StatusCode> {
    service
        .list_issues(&project, &filters)
        .map(Json)
        .map_err(|e| {
            tracing::error!("Failed to list issues for {}: {:?}", project, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Update request body: `_id` plus any subset of the updatable fields
#[derive(Debug, Default, Deserialize)]
struct UpdateRequest {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(flatten)]
    patch: IssuePatch,
}

/// Apply a partial update to the issue named by `_id`
async fn update_issue<S: IssueStore>(
    Path(_project): Path<String>,
    State(service): State<AppState<S>>,
    body: Option<Json<UpdateRequest>>,
) -> Json<Value> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let Some(id) = request.id.filter(|id| !id.is_empty()) else {
        return Json(json!({"error": "missing _id"}));
    };

    let payload = match service.update_issue(&id, &request.patch) {
        UpdateOutcome::Updated => json!({"result": "successfully updated", "_id": id}),
        UpdateOutcome::NoFields => json!({"error": "no update field(s) sent", "_id": id}),
        UpdateOutcome::NotFound => json!({"error": "could not update", "_id": id}),
    };
    Json(payload)
}

/// Delete request body: just `_id`
#[derive(Debug, Default, Deserialize)]
struct DeleteRequest {
    #[serde(rename = "_id")]
    id: Option<String>,
}

/// Delete the issue named by `_id`
async fn delete_issue<S: IssueStore>(
    Path(_project): Path<String>,
    State(service): State<AppState<S>>,
    body: Option<Json<DeleteRequest>>,
) -> Json<Value> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let Some(id) = request.id.filter(|id| !id.is_empty()) else {
        return Json(json!({"error": "missing _id"}));
    };

    let payload = match service.delete_issue(&id) {
        DeleteOutcome::Deleted => json!({"result": "successfully deleted", "_id": id}),
        DeleteOutcome::NotFound => json!({"error": "could not delete", "_id": id}),
    };
    Json(payload)
}
