//! Saved work package query model.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::OpenProjectClient;
use crate::error::Result;
use crate::filter::FilterOptions;
use crate::models::common::{create_resource, delete_resource, endpoint, get_resource, Link};
use crate::pagination::{fetch_collection, Collection};
use crate::traits::{Create, Delete, Get, List};

/// A saved work package query (a named, stored view with filters,
/// columns and sorting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    pub id: u64,

    #[serde(default)]
    pub name: String,

    /// Filters stored with the query.
    #[serde(default)]
    pub filters: Vec<QueryFilter>,

    #[serde(default)]
    pub starred: bool,

    /// Visible to every project member.
    #[serde(default)]
    pub public: bool,

    #[serde(default)]
    pub hidden: bool,

    /// Show sums of numeric columns.
    #[serde(default)]
    pub sums: bool,

    #[serde(default)]
    pub timeline_visible: bool,

    #[serde(default)]
    pub show_hierarchies: bool,

    #[serde(default)]
    pub highlighting_mode: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(rename = "_links", default)]
    pub links: QueryLinks,
}

/// A filter as stored in a saved query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFilter {
    #[serde(rename = "_type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Links of a saved query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort_by: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<Link>,
}

/// Body of a query creation request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuery {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    #[serde(rename = "_links", skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
}

impl NewQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Store the query in a project instead of globally.
    #[must_use]
    pub fn in_project(mut self, project_id: u64) -> Self {
        let href = format!("/{}", endpoint(&["projects", &project_id.to_string()]));
        self.links.insert("project".to_string(), Link::to(href));
        self
    }
}

#[async_trait]
impl Get for Query {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        let path = endpoint(&["queries", &id.to_string()]);
        get_resource(client, &path, "Query", id).await
    }
}

#[async_trait]
impl List for Query {
    type Query = FilterOptions;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        fetch_collection(client, &endpoint(&["queries"]), query, offset, page_size).await
    }
}

#[async_trait]
impl Create for Query {
    type Scope = ();
    type Params = NewQuery;

    #[tracing::instrument(skip(client, params), fields(name = %params.name))]
    async fn create(client: &OpenProjectClient, _scope: (), params: NewQuery) -> Result<Self> {
        create_resource(client, &endpoint(&["queries"]), &params).await
    }
}

#[async_trait]
impl Delete for Query {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &OpenProjectClient, id: u64) -> Result<()> {
        let path = endpoint(&["queries", &id.to_string()]);
        delete_resource(client, &path, "Query", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_query() {
        let json = r#"{
            "_type": "Query",
            "id": 9,
            "name": "Open bugs",
            "filters": [ { "_type": "StatusQueryFilter", "name": "Status" } ],
            "starred": true,
            "sums": false,
            "_links": {
                "project": { "href": "/api/v3/projects/3", "title": "Demo project" },
                "columns": [ { "href": "/api/v3/queries/columns/id", "title": "ID" } ]
            }
        }"#;

        let query: Query = serde_json::from_str(json).unwrap();
        assert_eq!(query.name, "Open bugs");
        assert!(query.starred);
        assert_eq!(query.filters[0].name, "Status");
        assert_eq!(query.links.columns.len(), 1);
        assert_eq!(query.links.project.as_ref().and_then(Link::id), Some(3));
    }

    #[test]
    fn test_new_query_in_project() {
        let json = serde_json::to_value(NewQuery::new("Mine").in_project(3)).unwrap();
        assert_eq!(json["name"], "Mine");
        assert_eq!(json["_links"]["project"]["href"], "/api/v3/projects/3");
    }
}
