//! List trait for fetching collections of resources.

use async_trait::async_trait;

use crate::client::OpenProjectClient;
use crate::error::Result;
use crate::page_turn::auto_page_turn;
use crate::pagination::Collection;

/// Page size used by [`List::list_all`]. Servers may serve smaller pages.
pub const LIST_ALL_PAGE_SIZE: u32 = 100;

/// List resources with filtering and pagination.
///
/// # Example
///
/// ```ignore
/// use openproject::{FilterOptions, List, OpenProjectClient, SearchOperator, User};
///
/// let client = OpenProjectClient::from_env()?;
/// let active = FilterOptions::new().with("status", SearchOperator::Equal, "active");
///
/// // A single page
/// let page = User::list_page(&client, &active, 1, 50).await?;
///
/// // Every page, fetched concurrently
/// let all = User::list_all(&client, &active).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send + 'static {
    /// Filter conditions accepted by the listing endpoint.
    type Query: Clone + Default + Send + Sync + 'static;

    /// List one page of resources matching the query.
    ///
    /// # Arguments
    ///
    /// * `client` - The OpenProject API client
    /// * `query` - Filter conditions
    /// * `offset` - Page index (1-indexed)
    /// * `page_size` - Number of elements per page
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &OpenProjectClient,
        query: &Self::Query,
        offset: u32,
        page_size: u32,
    ) -> Result<Collection<Self>>;

    /// List every resource matching the query as one merged collection.
    ///
    /// Learns the page count from the first page, then fetches the
    /// remaining pages concurrently. A page that fails after the first
    /// one is logged and left out of the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the first page request fails.
    async fn list_all(client: &OpenProjectClient, query: &Self::Query) -> Result<Collection<Self>> {
        let client = client.clone();
        auto_page_turn(
            query.clone(),
            LIST_ALL_PAGE_SIZE,
            move |query: Self::Query, offset, page_size| {
                let client = client.clone();
                async move { Self::list_page(&client, &query, offset, page_size).await }
            },
        )
        .await
    }
}
