//! Delete trait for removing resources.

use async_trait::async_trait;

use crate::client::OpenProjectClient;
use crate::error::Result;

/// Delete a resource by ID.
#[async_trait]
pub trait Delete {
    /// The ID type for this resource.
    type Id: Send;

    /// Delete the resource.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`](crate::OpenProjectError::NotFound) if the
    /// resource does not exist, or another error if the request fails.
    async fn delete(client: &OpenProjectClient, id: Self::Id) -> Result<()>;
}
