//! User model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::OpenProjectClient;
use crate::error::Result;
use crate::filter::FilterOptions;
use crate::models::common::{create_resource, delete_resource, endpoint, get_resource};
use crate::pagination::{fetch_collection, Collection};
use crate::traits::{Create, Delete, Get, List};

/// ID that resolves to the authenticated user.
pub const CURRENT_USER: &str = "me";

/// An OpenProject user.
///
/// Which attributes are present depends on the permissions of the
/// authenticated user; most are optional for that reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// HAL type (`User`, or `Group`/`PlaceholderUser` in principal listings).
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// User ID.
    pub id: u64,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Login name.
    #[serde(default)]
    pub login: Option<String>,

    /// Whether the user is an administrator.
    #[serde(default)]
    pub admin: Option<bool>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Avatar image URL.
    #[serde(default)]
    pub avatar: Option<String>,

    /// Account status (`active`, `registered`, `locked`, `invited`).
    #[serde(default)]
    pub status: Option<String>,

    /// Preferred language.
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Returns true if the account is active.
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }
}

/// Body of a user creation request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub login: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    /// `active` or `invited`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[async_trait]
impl Get for User {
    /// Numeric ID, or [`CURRENT_USER`].
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &OpenProjectClient, id: String) -> Result<Self> {
        let path = endpoint(&["users", &id]);
        get_resource(client, &path, "User", id).await
    }
}

#[async_trait]
impl List for User {
    type Query = FilterOptions;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>> {
        fetch_collection(client, &endpoint(&["users"]), query, offset, page_size).await
    }
}

#[async_trait]
impl Create for User {
    type Scope = ();
    type Params = NewUser;

    #[tracing::instrument(skip(client, params), fields(login = %params.login))]
    async fn create(client: &OpenProjectClient, _scope: (), params: NewUser) -> Result<Self> {
        create_resource(client, &endpoint(&["users"]), &params).await
    }
}

#[async_trait]
impl Delete for User {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &OpenProjectClient, id: u64) -> Result<()> {
        let path = endpoint(&["users", &id.to_string()]);
        delete_resource(client, &path, "User", id).await
    }
}
