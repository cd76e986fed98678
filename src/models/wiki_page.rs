//! Wiki page model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::OpenProjectClient;
use crate::error::Result;
use crate::models::common::{endpoint, get_resource, Link};
use crate::traits::Get;

/// A page of a project wiki. The API exposes metadata only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiPage {
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "_links", default)]
    pub links: WikiPageLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiPageLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Link>,
}

impl WikiPage {
    pub fn project_name(&self) -> Option<&str> {
        self.links.project.as_ref()?.title()
    }
}

#[async_trait]
impl Get for WikiPage {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        let path = endpoint(&["wiki_pages", &id.to_string()]);
        get_resource(client, &path, "Wiki page", id).await
    }
}
