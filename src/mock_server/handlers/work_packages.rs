//! Work package endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{authorize, error_response, not_found, paginate, ListParams, SharedState};
use crate::mock_server::state::MockState;
use crate::mock_server::Fixtures;
use crate::{Formattable, WorkPackage};

/// Body of `POST /api/v3/projects/{id}/work_packages`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkPackageBody {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: Option<Formattable>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// GET /api/v3/work_packages/{id}
pub async fn get_work_package(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.work_packages.get(&id) {
        Some(wp) => (StatusCode::OK, Json(wp.clone())).into_response(),
        None => not_found("work package", &id.to_string()),
    }
}

/// GET /api/v3/work_packages
pub async fn list_work_packages(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    let state = state.read().await;
    list_in(&state, &headers, None, &params)
}

/// GET /api/v3/projects/{id}/work_packages
pub async fn list_project_work_packages(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(project): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let state = state.read().await;
    let Some(project_id) = state.find_project(&project).map(|p| p.id) else {
        return not_found("project", &project);
    };
    list_in(&state, &headers, Some(project_id), &params)
}

fn list_in(
    state: &MockState,
    headers: &HeaderMap,
    project: Option<u64>,
    params: &ListParams,
) -> Response {
    if let Err(denied) = authorize(state, headers) {
        return denied;
    }

    let filters = match params.filter_options() {
        Ok(filters) => filters,
        Err(invalid) => return invalid,
    };

    let work_packages = state.list_work_packages(project, &filters);
    match paginate(state, &work_packages, params) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(failed) => failed,
    }
}

/// POST /api/v3/projects/{id}/work_packages
pub async fn create_work_package(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(project): Path<String>,
    Json(body): Json<CreateWorkPackageBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let Some(project) = state.find_project(&project).cloned() else {
        return not_found("project", &project);
    };

    if body.subject.trim().is_empty() {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "PropertyConstraintViolation",
            "Subject can't be blank.",
        );
    }

    let default_status = state
        .statuses
        .values()
        .find(|s| s.is_default)
        .cloned()
        .unwrap_or_else(|| Fixtures::status(1, "New", false));

    let id = MockState::next_id(&state.work_packages);
    let mut wp: WorkPackage = Fixtures::work_package(id, &body.subject, &default_status, &project);
    wp.description = body.description;
    wp.start_date = body.start_date;
    wp.due_date = body.due_date;
    wp.created_at = Some(chrono::Utc::now());
    state.work_packages.insert(id, wp.clone());

    (StatusCode::CREATED, Json(wp)).into_response()
}

/// DELETE /api/v3/work_packages/{id}
pub async fn delete_work_package(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.work_packages.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("work package", &id.to_string()),
    }
}
