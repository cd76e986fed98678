//! Project endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, not_found, paginate, ListParams, SharedState};
use crate::Project;

/// GET /api/v3/projects/{id}
pub async fn get_project(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.find_project(&id) {
        Some(project) => (StatusCode::OK, Json(project.clone())).into_response(),
        None => not_found("project", &id),
    }
}

/// GET /api/v3/projects
pub async fn list_projects(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let projects: Vec<&Project> = state.projects.values().collect();
    match paginate(&state, &projects, &params) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(failed) => failed,
    }
}
