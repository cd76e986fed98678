//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Utc};

use crate::{Formattable, Link, Project, ProjectLinks, Status, User, WorkPackage, WorkPackageLinks};

/// Number of work packages in the default scenario.
pub const DEFAULT_WORK_PACKAGE_COUNT: u64 = 25;

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Status Fixtures
    // =========================================================================

    /// Create a status.
    pub fn status(id: u64, name: &str, is_closed: bool) -> Status {
        Status {
            kind: Some("Status".to_string()),
            id,
            name: name.to_string(),
            is_closed,
            color: None,
            is_default: id == 1,
            is_readonly: false,
            position: u32::try_from(id).unwrap_or(u32::MAX),
        }
    }

    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// Create an active project.
    pub fn project(id: u64, identifier: &str, name: &str) -> Project {
        Project {
            kind: Some("Project".to_string()),
            id,
            identifier: identifier.to_string(),
            name: name.to_string(),
            active: true,
            public: false,
            description: Some(Formattable::markdown(format!("The {name}"))),
            status_explanation: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single(),
            updated_at: None,
            links: ProjectLinks {
                self_link: Some(Self::link(&format!("/api/v3/projects/{id}"), name)),
                work_packages: Some(Link::to(format!("/api/v3/projects/{id}/work_packages"))),
                ..ProjectLinks::default()
            },
        }
    }

    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Create an active user.
    pub fn user(id: u64, login: &str, name: &str) -> User {
        let (first_name, last_name) = name.split_once(' ').unwrap_or((name, ""));
        User {
            kind: Some("User".to_string()),
            id,
            name: name.to_string(),
            login: Some(login.to_string()),
            admin: Some(id == 1),
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            email: Some(format!("{login}@example.com")),
            avatar: None,
            status: Some("active".to_string()),
            language: Some("en".to_string()),
            created_at: Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).single(),
            updated_at: None,
        }
    }

    // =========================================================================
    // Work Package Fixtures
    // =========================================================================

    /// Create a work package in `project` with `status`.
    pub fn work_package(id: u64, subject: &str, status: &Status, project: &Project) -> WorkPackage {
        WorkPackage {
            kind: Some("WorkPackage".to_string()),
            id,
            subject: subject.to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            due_date: None,
            percentage_done: Some(0),
            lock_version: 0,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).single(),
            updated_at: None,
            links: WorkPackageLinks {
                self_link: Some(Self::link(&format!("/api/v3/work_packages/{id}"), subject)),
                status: Some(Self::link(&format!("/api/v3/statuses/{}", status.id), &status.name)),
                project: Some(Self::link(
                    &format!("/api/v3/projects/{}", project.id),
                    &project.name,
                )),
                activities: Some(Link::to(format!("/api/v3/work_packages/{id}/activities"))),
                ..WorkPackageLinks::default()
            },
            extra: BTreeMap::new(),
        }
    }

    fn link(href: &str, title: &str) -> Link {
        Link {
            title: Some(title.to_string()),
            ..Link::to(href)
        }
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// Default scenario: three statuses, two projects, three users and
    /// [`DEFAULT_WORK_PACKAGE_COUNT`] work packages.
    ///
    /// Work package `n` is in status "New" when `n` is odd and "In progress"
    /// otherwise; the first 15 belong to the demo project.
    pub fn default_scenario() -> DefaultScenario {
        let statuses = vec![
            Self::status(1, "New", false),
            Self::status(7, "In progress", false),
            Self::status(12, "Closed", true),
        ];

        let projects = vec![
            Self::project(1, "demo-project", "Demo project"),
            Self::project(2, "scrum-project", "Scrum project"),
        ];

        let users = vec![
            Self::user(1, "admin", "OpenProject Admin"),
            Self::user(5, "ada", "Ada Lovelace"),
            Self::user(6, "grace", "Grace Hopper"),
        ];

        let work_packages = (1..=DEFAULT_WORK_PACKAGE_COUNT)
            .map(|id| {
                let status = if id % 2 == 1 { &statuses[0] } else { &statuses[1] };
                let project = if id <= 15 { &projects[0] } else { &projects[1] };
                Self::work_package(id, &format!("Work package {id}"), status, project)
            })
            .collect();

        DefaultScenario {
            statuses,
            projects,
            users,
            work_packages,
        }
    }
}

/// A complete test scenario with related entities.
pub struct DefaultScenario {
    pub statuses: Vec<Status>,
    pub projects: Vec<Project>,
    pub users: Vec<User>,
    pub work_packages: Vec<WorkPackage>,
}
