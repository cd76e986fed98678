//! Mock server state management.
//!
//! Provides the in-memory data store for the mock OpenProject API server.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{FilterOptions, Link, Project, SearchOperator, Status, User, WorkPackage};

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access. Ordered maps
/// keep listings in ascending ID order, like the real API's default sort.
#[derive(Debug, Default)]
pub struct MockState {
    /// Users indexed by ID.
    pub users: BTreeMap<u64, User>,

    /// Work packages indexed by ID.
    pub work_packages: BTreeMap<u64, WorkPackage>,

    /// Projects indexed by ID.
    pub projects: BTreeMap<u64, Project>,

    /// Statuses indexed by ID.
    pub statuses: BTreeMap<u64, Status>,

    /// Listing pages (1-indexed offsets) answered with a server error.
    pub failing_pages: BTreeSet<u32>,

    /// User returned for `/users/me`.
    pub current_user: Option<u64>,

    /// Optional API key. If set, requests must authenticate with it.
    pub required_api_key: Option<String>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a user to the state.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    /// Add a work package to the state.
    pub fn with_work_package(mut self, work_package: WorkPackage) -> Self {
        self.work_packages.insert(work_package.id, work_package);
        self
    }

    /// Add a project to the state.
    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.insert(project.id, project);
        self
    }

    /// Add a status to the state.
    pub fn with_status(mut self, status: Status) -> Self {
        self.statuses.insert(status.id, status);
        self
    }

    /// Make every listing fail on the given page.
    pub fn with_failing_page(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }

    /// Set the user returned for `me`.
    pub fn with_current_user(mut self, id: u64) -> Self {
        self.current_user = Some(id);
        self
    }

    /// Require API key authentication.
    pub fn with_required_api_key(mut self, key: &str) -> Self {
        self.required_api_key = Some(key.to_string());
        self
    }

    /// Get a user by ID or `me`.
    pub fn get_user(&self, id: &str) -> Option<&User> {
        let id = match id {
            crate::CURRENT_USER => self.current_user?,
            other => other.parse().ok()?,
        };
        self.users.get(&id)
    }

    /// List work packages, optionally of one project, matching `filters`.
    ///
    /// Only `status` conditions with `=` or `<>` are evaluated; other
    /// conditions are ignored.
    pub fn list_work_packages(
        &self,
        project: Option<u64>,
        filters: &FilterOptions,
    ) -> Vec<&WorkPackage> {
        self.work_packages
            .values()
            .filter(|wp| project.is_none() || link_id(wp.links.project.as_ref()) == project)
            .filter(|wp| {
                filters.fields.iter().filter(|f| f.field == "status").all(|condition| {
                    let status = link_id(wp.links.status.as_ref()).map(|id| id.to_string());
                    let listed = status.is_some_and(|s| condition.values.contains(&s));
                    match condition.operator {
                        SearchOperator::Equal => listed,
                        SearchOperator::NotEqual => !listed,
                        _ => true,
                    }
                })
            })
            .collect()
    }

    /// Find a project by numeric ID or identifier.
    pub fn find_project(&self, id_or_identifier: &str) -> Option<&Project> {
        match id_or_identifier.parse::<u64>() {
            Ok(id) => self.projects.get(&id),
            Err(_) => self.projects.values().find(|p| p.identifier == id_or_identifier),
        }
    }

    /// Next free ID of a map.
    pub fn next_id<T>(map: &BTreeMap<u64, T>) -> u64 {
        map.keys().next_back().map_or(1, |id| id + 1)
    }
}

fn link_id(link: Option<&Link>) -> Option<u64> {
    link.and_then(Link::id)
}
