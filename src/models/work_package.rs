//! Work package model and trait implementations.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::OpenProjectClient;
use crate::error::Result;
use crate::filter::FilterOptions;
use crate::models::activity::{activities_from_href, Activity};
use crate::models::common::{
    create_resource, delete_resource, endpoint, get_resource, get_resource_with_query, Formattable,
    Link,
};
use crate::pagination::{fetch_collection, Collection};
use crate::traits::{Create, Delete, Get, List};

/// An OpenProject work package (task, bug, feature, milestone, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackage {
    /// HAL type (`WorkPackage`).
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Work package ID.
    pub id: u64,

    /// One line summary.
    #[serde(default)]
    pub subject: String,

    /// Long description.
    #[serde(default)]
    pub description: Option<Formattable>,

    /// Planned start.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Planned finish.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Completion in percent.
    #[serde(default)]
    pub percentage_done: Option<u8>,

    /// Optimistic locking counter, required for updates.
    #[serde(default)]
    pub lock_version: u32,

    /// When the work package was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the work package was last changed.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Links to related resources.
    #[serde(rename = "_links", default)]
    pub links: WorkPackageLinks,

    /// Attributes without a dedicated field, custom fields included.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Links of a work package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackageLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub work_package_type: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Link>,
}

impl WorkPackage {
    /// Title of the status link (e.g. "In progress").
    pub fn status_name(&self) -> Option<&str> {
        self.links.status.as_ref()?.title()
    }

    /// Title of the type link (e.g. "Bug").
    pub fn type_name(&self) -> Option<&str> {
        self.links.work_package_type.as_ref()?.title()
    }

    /// Title of the project link.
    pub fn project_name(&self) -> Option<&str> {
        self.links.project.as_ref()?.title()
    }

    /// Name of the assignee, if one is set.
    pub fn assignee_name(&self) -> Option<&str> {
        self.links.assignee.as_ref()?.title()
    }

    /// A custom field value by its API name (e.g. `customField3`).
    pub fn custom_field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Fetch a work package, passing extra query parameters such as
    /// `timestamps` or `select` along with the request.
    pub async fn get_with_query<Q>(client: &OpenProjectClient, id: u64, query: &Q) -> Result<Self>
    where
        Q: Serialize + Sync + ?Sized,
    {
        let path = endpoint(&["work_packages", &id.to_string()]);
        get_resource_with_query(client, &path, query, "Work package", id).await
    }

    /// Fetch the activity journal of this work package.
    ///
    /// Falls back to the conventional activities endpoint when the
    /// representation carries no activities link.
    pub async fn activities(&self, client: &OpenProjectClient) -> Result<Collection<Activity>> {
        match self.links.activities.as_ref().and_then(|l| l.href.as_deref()) {
            Some(href) => activities_from_href(client, href).await,
            None => {
                let href = endpoint(&["work_packages", &self.id.to_string(), "activities"]);
                activities_from_href(client, &href).await
            }
        }
    }
}

/// Query for listing work packages.
///
/// With a `project`, only that project's work packages are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkPackageQuery {
    /// Project ID or identifier.
    pub project: Option<String>,
    /// Filter conditions.
    pub filters: FilterOptions,
}

impl WorkPackageQuery {
    /// Restrict the listing to a project.
    #[must_use]
    pub fn in_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }
}

impl From<FilterOptions> for WorkPackageQuery {
    fn from(filters: FilterOptions) -> Self {
        Self {
            project: None,
            filters,
        }
    }
}

/// Body of a work package creation request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkPackage {
    pub subject: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Formattable>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Links to type, status, assignee and similar, keyed by link name.
    #[serde(rename = "_links", skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
}

impl NewWorkPackage {
    /// A work package with only a subject; the server picks defaults.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Set a markdown description.
    #[must_use]
    pub fn with_description(mut self, raw: impl Into<String>) -> Self {
        self.description = Some(Formattable::markdown(raw));
        self
    }

    /// Set the planned start and finish.
    #[must_use]
    pub fn with_dates(mut self, start: Option<NaiveDate>, due: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.due_date = due;
        self
    }

    /// Link the work package to another resource, e.g. `("type", "/api/v3/types/1")`.
    #[must_use]
    pub fn with_link(mut self, name: impl Into<String>, href: impl Into<String>) -> Self {
        self.links.insert(name.into(), Link::to(href));
        self
    }
}

#[async_trait]
impl Get for WorkPackage {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        let path = endpoint(&["work_packages", &id.to_string()]);
        get_resource(client, &path, "Work package", id).await
    }
}

#[async_trait]
impl List for WorkPackage {
    type Query = WorkPackageQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        let path = match &query.project {
            Some(project) => endpoint(&["projects", project, "work_packages"]),
            None => endpoint(&["work_packages"]),
        };
        fetch_collection(client, &path, &query.filters, offset, page_size).await
    }
}

#[async_trait]
impl Create for WorkPackage {
    /// Project ID or identifier.
    type Scope = String;
    type Params = NewWorkPackage;

    #[tracing::instrument(skip(client, params), fields(subject = %params.subject))]
    async fn create(
        client: &OpenProjectClient,
        project: String,
        params: NewWorkPackage,
    ) -> Result<Self> {
        let path = endpoint(&["projects", &project, "work_packages"]);
        create_resource(client, &path, &params).await
    }
}

#[async_trait]
impl Delete for WorkPackage {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &OpenProjectClient, id: u64) -> Result<()> {
        let path = endpoint(&["work_packages", &id.to_string()]);
        delete_resource(client, &path, "Work package", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_work_package() {
        let json = r#"{
            "_type": "WorkPackage",
            "id": 1528,
            "lockVersion": 3,
            "subject": "Write API documentation",
            "description": {
                "format": "markdown",
                "raw": "Cover filters",
                "html": "<p>Cover filters</p>"
            },
            "startDate": "2024-03-01",
            "dueDate": null,
            "percentageDone": 40,
            "createdAt": "2024-02-20T10:15:00Z",
            "updatedAt": "2024-03-02T08:00:00Z",
            "customField3": "backend",
            "_links": {
                "self": {
                    "href": "/api/v3/work_packages/1528",
                    "title": "Write API documentation"
                },
                "status": { "href": "/api/v3/statuses/7", "title": "In progress" },
                "type": { "href": "/api/v3/types/1", "title": "Task" },
                "assignee": { "href": null },
                "activities": { "href": "/api/v3/work_packages/1528/activities" }
            }
        }"#;

        let wp: WorkPackage = serde_json::from_str(json).unwrap();
        assert_eq!(wp.id, 1528);
        assert_eq!(wp.lock_version, 3);
        assert_eq!(wp.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(wp.due_date.is_none());
        assert_eq!(wp.status_name(), Some("In progress"));
        assert_eq!(wp.type_name(), Some("Task"));
        assert_eq!(wp.assignee_name(), None);
        assert_eq!(wp.links.status.as_ref().and_then(Link::id), Some(7));
        assert_eq!(wp.custom_field("customField3"), Some(&Value::from("backend")));
    }

    #[test]
    fn test_new_work_package_body() {
        let body = NewWorkPackage::new("Fix login")
            .with_description("Users get logged out")
            .with_dates(NaiveDate::from_ymd_opt(2024, 5, 1), None)
            .with_link("type", "/api/v3/types/2");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["subject"], "Fix login");
        assert_eq!(json["description"]["raw"], "Users get logged out");
        assert_eq!(json["startDate"], "2024-05-01");
        assert!(json.get("dueDate").is_none());
        assert_eq!(json["_links"]["type"]["href"], "/api/v3/types/2");
    }

    #[test]
    fn test_new_work_package_without_links() {
        let json = serde_json::to_value(NewWorkPackage::new("Plain")).unwrap();
        assert_eq!(json, serde_json::json!({ "subject": "Plain" }));
    }
}
