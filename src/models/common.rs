//! Building blocks shared by the OpenProject resource representations.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::OpenProjectClient;
use crate::error::{OpenProjectError, Result};

/// Root of the OpenProject API v3 endpoints, relative to the instance URL.
pub(crate) const API_ROOT: &str = "api/v3";

/// A HAL link to another resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target of the link; `None` for an unset link (e.g. no assignee).
    #[serde(default)]
    pub href: Option<String>,
    /// Display title of the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// HTTP method for action links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Media type of the target.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl Link {
    /// A link to `href`.
    pub fn to(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    /// The numeric ID at the end of the link target, if any.
    ///
    /// `/api/v3/statuses/7` yields `7`.
    pub fn id(&self) -> Option<u64> {
        self.href.as_deref()?.rsplit('/').next()?.parse().ok()
    }

    /// Title of the target, if it is set.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// Text in OpenProject's formattable representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formattable {
    /// Markup language of `raw` (usually `markdown`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Source text.
    #[serde(default)]
    pub raw: String,
    /// Rendered HTML, filled in by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Formattable {
    /// Markdown text.
    pub fn markdown(raw: impl Into<String>) -> Self {
        Self {
            format: Some("markdown".to_string()),
            raw: raw.into(),
            html: None,
        }
    }
}

/// Path of a resource endpoint below the API root.
pub(crate) fn endpoint(segments: &[&str]) -> String {
    let mut path = API_ROOT.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&urlencoding::encode(segment));
    }
    path
}

/// GET a single resource, mapping a 404 to `NotFound`.
pub(crate) async fn get_resource<T: DeserializeOwned>(
    client: &OpenProjectClient,
    path: &str,
    entity_type: &'static str,
    id: impl ToString,
) -> Result<T> {
    let response = client
        .get(path)
        .await
        .map_err(|e| e.into_not_found(entity_type, id.to_string()))?;
    response.json().await.map_err(OpenProjectError::HttpError)
}

/// GET a single resource with extra query parameters.
pub(crate) async fn get_resource_with_query<T, Q>(
    client: &OpenProjectClient,
    path: &str,
    query: &Q,
    entity_type: &'static str,
    id: impl ToString,
) -> Result<T>
where
    T: DeserializeOwned,
    Q: Serialize + ?Sized,
{
    let response = client
        .get_with_query(path, query)
        .await
        .map_err(|e| e.into_not_found(entity_type, id.to_string()))?;
    response.json().await.map_err(OpenProjectError::HttpError)
}

/// POST a new resource and decode the stored representation.
pub(crate) async fn create_resource<B, T>(
    client: &OpenProjectClient,
    path: &str,
    body: &B,
) -> Result<T>
where
    B: Serialize + Sync + ?Sized,
    T: DeserializeOwned,
{
    let response = client.post(path, body).await?;
    response.json().await.map_err(OpenProjectError::HttpError)
}

/// DELETE a resource, mapping a 404 to `NotFound`.
pub(crate) async fn delete_resource(
    client: &OpenProjectClient,
    path: &str,
    entity_type: &'static str,
    id: impl ToString,
) -> Result<()> {
    client
        .delete(path)
        .await
        .map_err(|e| e.into_not_found(entity_type, id.to_string()))?;
    Ok(())
}
