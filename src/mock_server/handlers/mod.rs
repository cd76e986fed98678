//! HTTP request handlers for the mock server.

pub mod projects;
pub mod statuses;
pub mod users;
pub mod work_packages;

pub use projects::*;
pub use statuses::*;
pub use users::*;
pub use work_packages::*;

use std::sync::Arc;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::auth::API_KEY_USER;
use crate::mock_server::state::MockState;
use crate::{Collection, FilterOptions};

/// Shared state handle passed to every handler.
pub type SharedState = Arc<RwLock<MockState>>;

/// Page size used when a listing request has none.
const DEFAULT_MOCK_PAGE_SIZE: u32 = 20;

/// Query parameters of collection endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub offset: Option<u32>,
    pub page_size: Option<u32>,
    pub filters: Option<String>,
}

impl ListParams {
    /// Decode the `filters` parameter.
    pub fn filter_options(&self) -> Result<FilterOptions, Response> {
        match self.filters.as_deref() {
            Some(raw) => FilterOptions::from_query_value(raw).map_err(|e| {
                error_response(StatusCode::BAD_REQUEST, "InvalidQuery", &e.to_string())
            }),
            None => Ok(FilterOptions::new()),
        }
    }
}

/// Slice one page out of `items` and wrap it in a collection envelope.
///
/// Fails with a server error if the requested page is configured to fail.
pub fn paginate<T: Clone>(
    state: &MockState,
    items: &[&T],
    params: &ListParams,
) -> Result<Collection<T>, Response> {
    let offset = params.offset.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_MOCK_PAGE_SIZE);

    if state.failing_pages.contains(&offset) {
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "InternalServerError",
            &format!("page {offset} is configured to fail"),
        ));
    }

    let start = ((offset - 1) as usize).saturating_mul(page_size as usize);
    let elements: Vec<T> = items
        .iter()
        .skip(start)
        .take(page_size as usize)
        .map(|item| (*item).clone())
        .collect();

    Ok(Collection::new(elements, items.len() as u64, offset, page_size))
}

/// OpenProject style error document.
pub fn error_response(status: StatusCode, identifier: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "_type": "Error",
            "errorIdentifier": format!("urn:openproject-org:api:v3:errors:{identifier}"),
            "message": message,
        })),
    )
        .into_response()
}

/// 404 for a missing resource.
pub fn not_found(entity: &str, id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "NotFound",
        &format!("The requested {entity} {id} could not be found."),
    )
}

/// Reject the request unless it carries the required API key.
pub fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(key) = state.required_api_key.as_deref() else {
        return Ok(());
    };

    let expected = format!("Basic {}", BASE64.encode(format!("{API_KEY_USER}:{key}")));
    let provided = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    if provided == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Unauthenticated",
            "You need to be authenticated to access this resource.",
        ))
    }
}
