//! Project model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::OpenProjectClient;
use crate::error::Result;
use crate::filter::FilterOptions;
use crate::models::category::{Category, CategoryQuery};
use crate::models::common::{create_resource, endpoint, get_resource, Formattable, Link};
use crate::models::work_package::{WorkPackage, WorkPackageQuery};
use crate::pagination::{fetch_collection, Collection};
use crate::traits::{Create, Get, List};

/// An OpenProject project.
///
/// Projects contain work packages, categories and wiki pages and can be
/// nested below a parent project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Numeric project ID.
    pub id: u64,

    /// URL-safe identifier (e.g. "demo-project").
    #[serde(default)]
    pub identifier: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Whether the project is active (not archived).
    #[serde(default)]
    pub active: bool,

    /// Whether the project is visible to anonymous users.
    #[serde(default)]
    pub public: bool,

    #[serde(default)]
    pub description: Option<Formattable>,

    /// Explanation of the current project status.
    #[serde(default)]
    pub status_explanation: Option<Formattable>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(rename = "_links", default)]
    pub links: ProjectLinks,
}

/// Links of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_packages: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Link>,
}

impl Project {
    /// Name of the parent project, if this is a subproject.
    pub fn parent_name(&self) -> Option<&str> {
        self.links.parent.as_ref()?.title()
    }

    /// List every work package of this project matching `filters`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let project = Project::get(&client, 3).await?;
    /// let open = FilterOptions::new().with("status", SearchOperator::Equal, "1");
    /// for wp in project.work_packages(&client, open).await? {
    ///     println!("#{} {}", wp.id, wp.subject);
    /// }
    /// ```
    pub async fn work_packages(
        &self,
        client: &OpenProjectClient,
        filters: FilterOptions,
    ) -> Result<Collection<WorkPackage>> {
        let query = WorkPackageQuery::from(filters).in_project(self.id.to_string());
        WorkPackage::list_all(client, &query).await
    }

    /// List the work package categories of this project.
    pub async fn categories(&self, client: &OpenProjectClient) -> Result<Collection<Category>> {
        Category::list_all(client, &CategoryQuery::for_project(self.id.to_string())).await
    }
}

/// Body of a project creation request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,

    /// Generated from the name by the server when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Formattable>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
}

impl NewProject {
    /// A project with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Get for Project {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        let path = endpoint(&["projects", &id.to_string()]);
        get_resource(client, &path, "Project", id).await
    }
}

#[async_trait]
impl List for Project {
    type Query = FilterOptions;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        fetch_collection(client, &endpoint(&["projects"]), query, offset, page_size).await
    }
}

#[async_trait]
impl Create for Project {
    type Scope = ();
    type Params = NewProject;

    #[tracing::instrument(skip(client, params), fields(name = %params.name))]
    async fn create(client: &OpenProjectClient, _scope: (), params: NewProject) -> Result<Self> {
        create_resource(client, &endpoint(&["projects"]), &params).await
    }
}
