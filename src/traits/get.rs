//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::OpenProjectClient;
use crate::error::Result;

/// Fetch a single resource by ID.
///
/// # Example
///
/// ```ignore
/// use openproject::{Get, OpenProjectClient, WorkPackage};
///
/// let client = OpenProjectClient::from_env()?;
/// let wp = WorkPackage::get(&client, 42).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this resource (numeric for most, a string for users
    /// so that `me` can be requested).
    type Id: Send;

    /// Fetch the resource by ID.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`](crate::OpenProjectError::NotFound) if the
    /// resource does not exist, or another error if the request fails.
    async fn get(client: &OpenProjectClient, id: Self::Id) -> Result<Self>;
}
