//! Attachment model and download.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::OpenProjectClient;
use crate::error::Result;
use crate::models::common::{endpoint, get_resource, Formattable, Link};
use crate::traits::Get;

/// A file attached to a work package, wiki page or other container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    pub id: u64,

    #[serde(default)]
    pub file_name: String,

    /// Size in bytes.
    #[serde(default)]
    pub file_size: u64,

    #[serde(default)]
    pub description: Option<Formattable>,

    /// MIME type.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Checksum of the content.
    #[serde(default)]
    pub digest: Option<AttachmentDigest>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(rename = "_links", default)]
    pub links: AttachmentLinks,
}

/// Checksum of an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDigest {
    /// E.g. `md5`.
    pub algorithm: String,
    pub hash: String,
}

/// Links of an attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_location: Option<Link>,
}

impl Attachment {
    /// Download the content of the attachment with the given ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the attachment does not exist or the request fails.
    #[tracing::instrument(skip(client))]
    pub async fn download(client: &OpenProjectClient, id: u64) -> Result<Vec<u8>> {
        let path = endpoint(&["attachments", &id.to_string(), "content"]);
        client
            .download(&path)
            .await
            .map_err(|e| e.into_not_found("Attachment", id))
    }

    /// Download the content of this attachment.
    pub async fn content(&self, client: &OpenProjectClient) -> Result<Vec<u8>> {
        Self::download(client, self.id).await
    }
}

#[async_trait]
impl Get for Attachment {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: u64) -> Result<Self> {
        let path = endpoint(&["attachments", &id.to_string()]);
        get_resource(client, &path, "Attachment", id).await
    }
}
