//! Mock OpenProject API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the
//! OpenProject API v3 for integration and end-to-end testing. Unlike
//! wiremock which mocks at the HTTP level per-test, this server maintains
//! state across requests, enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use openproject::mock_server::MockServer;
//! use openproject::{Auth, Get, OpenProjectClient, WorkPackage};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = OpenProjectClient::new(server.url(), Auth::None).unwrap();
//!
//!     // Server comes with default fixtures
//!     let wp = WorkPackage::get(&client, 1).await.unwrap();
//!     assert_eq!(wp.subject, "Work package 1");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures, DEFAULT_WORK_PACKAGE_COUNT};
pub use server::MockServer;
pub use state::MockState;
