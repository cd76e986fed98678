//! Work package category model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::OpenProjectClient;
use crate::error::{OpenProjectError, Result};
use crate::filter::FilterOptions;
use crate::models::common::{endpoint, get_resource, Link};
use crate::pagination::{fetch_collection, Collection};
use crate::traits::{Get, List};

/// A work package category, defined per project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "_links", default)]
    pub links: CategoryLinks,
}

/// Links of a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Link>,
    /// User new work packages of this category are assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_assignee: Option<Link>,
}

/// Categories are listed per project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryQuery {
    /// Project ID or identifier.
    pub project: String,
}

impl CategoryQuery {
    pub fn for_project(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
        }
    }
}

#[async_trait]
impl Get for Category {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        let path = endpoint(&["categories", &id.to_string()]);
        get_resource(client, &path, "Category", id).await
    }
}

#[async_trait]
impl List for Category {
    type Query = CategoryQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        if query.project.trim().is_empty() {
            return Err(OpenProjectError::ConfigMissing(
                "a project is required to list categories".to_string(),
            ));
        }
        let path = endpoint(&["projects", &query.project, "categories"]);
        fetch_collection(client, &path, &FilterOptions::new(), offset, page_size).await
    }
}
