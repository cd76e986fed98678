//! Activity (journal entry) model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::OpenProjectClient;
use crate::error::{OpenProjectError, Result};
use crate::models::common::{endpoint, get_resource, Formattable, Link};
use crate::pagination::Collection;
use crate::traits::Get;

/// A journal entry of a work package: a comment and/or attribute changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    pub id: u64,

    /// Comment written with the change, empty when there is none.
    #[serde(default)]
    pub comment: Option<Formattable>,

    /// One entry per changed attribute.
    #[serde(default)]
    pub details: Vec<Formattable>,

    /// Journal version of the work package.
    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(rename = "_links", default)]
    pub links: ActivityLinks,
}

/// Links of an activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_package: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Link>,
}

impl Activity {
    /// Raw text of the comment, if one was written.
    pub fn comment_text(&self) -> Option<&str> {
        self.comment
            .as_ref()
            .map(|c| c.raw.as_str())
            .filter(|raw| !raw.is_empty())
    }

    /// Name of the user who made the change.
    pub fn user_name(&self) -> Option<&str> {
        self.links.user.as_ref()?.title()
    }
}

#[async_trait]
impl Get for Activity {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        let path = endpoint(&["activities", &id.to_string()]);
        get_resource(client, &path, "Activity", id).await
    }
}

/// Fetch the activities behind an activities link of a work package,
/// e.g. `/api/v3/work_packages/36353/activities`.
///
/// # Errors
///
/// Returns [`OpenProjectError::InvalidHref`] if `href` is empty, or an
/// error if the request fails.
#[tracing::instrument(skip(client))]
pub async fn activities_from_href(
    client: &OpenProjectClient,
    href: &str,
) -> Result<Collection<Activity>> {
    let path = href.strip_prefix('/').unwrap_or(href);
    if path.trim().is_empty() {
        return Err(OpenProjectError::InvalidHref(href.to_string()));
    }

    let response = client.get(path).await?;
    response.json().await.map_err(OpenProjectError::HttpError)
}
