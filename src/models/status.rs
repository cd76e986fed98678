//! Work package status model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::OpenProjectClient;
use crate::error::Result;
use crate::filter::FilterOptions;
use crate::models::common::{endpoint, get_resource};
use crate::pagination::{fetch_collection, Collection};
use crate::traits::{Get, List};

/// A work package status such as "New" or "Closed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Work packages in this status count as closed.
    #[serde(default)]
    pub is_closed: bool,
    /// Hex color, e.g. `#1A67A3`.
    #[serde(default)]
    pub color: Option<String>,
    /// Status assigned to new work packages.
    #[serde(default)]
    pub is_default: bool,
    /// Work packages in this status cannot be edited.
    #[serde(default)]
    pub is_readonly: bool,
    /// Sort position.
    #[serde(default)]
    pub position: u32,
}

#[async_trait]
impl Get for Status {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        let path = endpoint(&["statuses", &id.to_string()]);
        get_resource(client, &path, "Status", id).await
    }
}

#[async_trait]
impl List for Status {
    type Query = FilterOptions;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        fetch_collection(client, &endpoint(&["statuses"]), query, offset, page_size).await
    }
}
