//! User endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{authorize, error_response, not_found, paginate, ListParams, SharedState};
use crate::mock_server::state::MockState;
use crate::User;

/// Body of `POST /api/v3/users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    pub login: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub admin: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// GET /api/v3/users/{id}
pub async fn get_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.get_user(&id) {
        Some(user) => (StatusCode::OK, Json(user.clone())).into_response(),
        None => not_found("user", &id),
    }
}

/// GET /api/v3/users
pub async fn list_users(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let users: Vec<&User> = state.users.values().collect();
    match paginate(&state, &users, &params) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(failed) => failed,
    }
}

/// POST /api/v3/users
pub async fn create_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CreateUserBody>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    if state.users.values().any(|u| u.login.as_deref() == Some(body.login.as_str())) {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "PropertyConstraintViolation",
            "Username has already been taken.",
        );
    }

    let id = MockState::next_id(&state.users);
    let user = User {
        kind: Some("User".to_string()),
        id,
        name: format!("{} {}", body.first_name, body.last_name),
        login: Some(body.login),
        admin: Some(body.admin.unwrap_or(false)),
        first_name: Some(body.first_name),
        last_name: Some(body.last_name),
        email: Some(body.email),
        avatar: None,
        status: Some(body.status.unwrap_or_else(|| "active".to_string())),
        language: body.language,
        created_at: Some(chrono::Utc::now()),
        updated_at: None,
    };
    state.users.insert(id, user.clone());

    (StatusCode::CREATED, Json(user)).into_response()
}

/// DELETE /api/v3/users/{id}
pub async fn delete_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.users.remove(&id) {
        Some(_) => StatusCode::ACCEPTED.into_response(),
        None => not_found("user", &id.to_string()),
    }
}
