//! Status endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, not_found, paginate, ListParams, SharedState};
use crate::Status;

/// GET /api/v3/statuses/{id}
pub async fn get_status(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.statuses.get(&id) {
        Some(status) => (StatusCode::OK, Json(status.clone())).into_response(),
        None => not_found("status", &id.to_string()),
    }
}

/// GET /api/v3/statuses
pub async fn list_statuses(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let statuses: Vec<&Status> = state.statuses.values().collect();
    match paginate(&state, &statuses, &params) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(failed) => failed,
    }
}
