//! Mock OpenProject API server.
//!
//! Provides an axum-based HTTP server that simulates the OpenProject API v3.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock OpenProject API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock server stopped");
            }
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating an `OpenProjectClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// The default state: the default scenario with the admin as current user.
    pub fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario()).with_current_user(1)
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for status in scenario.statuses {
            state.statuses.insert(status.id, status);
        }

        for project in scenario.projects {
            state.projects.insert(project.id, project);
        }

        for user in scenario.users {
            state.users.insert(user.id, user);
        }

        for wp in scenario.work_packages {
            state.work_packages.insert(wp.id, wp);
        }

        state
    }

    /// Create the axum router with all routes.
    pub(crate) fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Work package routes
            .route("/api/v3/work_packages", get(handlers::list_work_packages))
            .route(
                "/api/v3/work_packages/:id",
                get(handlers::get_work_package).delete(handlers::delete_work_package),
            )
            // User routes
            .route("/api/v3/users", get(handlers::list_users).post(handlers::create_user))
            .route(
                "/api/v3/users/:id",
                get(handlers::get_user).delete(handlers::delete_user),
            )
            // Project routes
            .route("/api/v3/projects", get(handlers::list_projects))
            .route("/api/v3/projects/:id", get(handlers::get_project))
            .route(
                "/api/v3/projects/:id/work_packages",
                get(handlers::list_project_work_packages).post(handlers::create_work_package),
            )
            // Status routes
            .route("/api/v3/statuses", get(handlers::list_statuses))
            .route("/api/v3/statuses/:id", get(handlers::get_status))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
