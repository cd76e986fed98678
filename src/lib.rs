//! OpenProject API client library.
//!
//! A Rust library for the OpenProject REST API v3, built around a
//! trait-based architecture where each operation (Get, List, Create,
//! Delete) is a trait that resource types implement, and around a
//! concurrent page turner that fetches every page of a listing at once.
//!
//! # Quick Start
//!
//! ```no_run
//! use openproject::{
//!     FilterOptions, Get, List, OpenProjectClient, SearchOperator, User, WorkPackage,
//! };
//!
//! #[tokio::main]
//! async fn main() -> openproject::Result<()> {
//!     // Create client from environment variables
//!     let client = OpenProjectClient::from_env()?;
//!
//!     // Get a single work package
//!     let wp = WorkPackage::get(&client, 42).await?;
//!     println!("#{} {}", wp.id, wp.subject);
//!
//!     // The authenticated user
//!     let me = User::get(&client, "me".to_string()).await?;
//!     println!("Logged in as {}", me.name);
//!
//!     // Every open work package, all pages fetched concurrently
//!     let open = FilterOptions::new().with("status", SearchOperator::Equal, "1");
//!     let all = WorkPackage::list_all(&client, &open.into()).await?;
//!     println!("{} open work packages", all.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized around four core traits:
//!
//! - [`Get`] - Fetch a single resource by ID
//! - [`List`] - Fetch paginated collections of resources
//! - [`Create`] - Create a resource, optionally inside a parent
//! - [`Delete`] - Remove a resource
//!
//! [`List::list_all`] is built on [`auto_page_turn`], which works with any
//! page type implementing [`PageResult`].
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `OPENPROJECT_URL` (required) - Root URL of the OpenProject instance
//! - `OPENPROJECT_API_KEY` (optional) - API key, sent as basic auth

pub mod auth;
pub mod cli;
mod client;
mod error;
mod filter;
mod models;
pub mod output;
mod page_turn;
mod pagination;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use auth::Auth;
pub use client::OpenProjectClient;
pub use error::{OpenProjectError, Result};
pub use filter::{FilterField, FilterOptions, SearchOperator};
pub use output::PrettyPrint;
pub use page_turn::{
    auto_page_turn, auto_page_turn_with, FailurePolicy, PageFailure, PageTurn, PageTurnOptions,
    DEFAULT_PAGE_SIZE,
};
pub use pagination::{Collection, Embedded, PageResult, PaginationParams};

// Re-export traits
pub use traits::{Create, Delete, Get, List, LIST_ALL_PAGE_SIZE};

// Re-export models
pub use models::{
    // Shared building blocks
    Formattable,
    Link,
    // Work packages
    NewWorkPackage,
    WorkPackage,
    WorkPackageLinks,
    WorkPackageQuery,
    // Users
    NewUser,
    User,
    CURRENT_USER,
    // Projects
    NewProject,
    Project,
    ProjectLinks,
    // Statuses
    Status,
    // Saved queries
    NewQuery,
    Query,
    QueryFilter,
    QueryLinks,
    // Attachments
    Attachment,
    AttachmentDigest,
    AttachmentLinks,
    // Activities
    Activity,
    ActivityLinks,
    // Categories
    Category,
    CategoryLinks,
    CategoryQuery,
    // Wiki pages
    WikiPage,
    WikiPageLinks,
};

// Re-export convenience functions
pub use models::activities_from_href;
