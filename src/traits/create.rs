//! Create trait for adding resources.

use async_trait::async_trait;

use crate::client::OpenProjectClient;
use crate::error::Result;

/// Create a new resource.
///
/// Some resources are created inside a parent (work packages inside a
/// project); `Scope` carries that parent and is `()` otherwise.
///
/// # Example
///
/// ```ignore
/// use openproject::{Create, NewWorkPackage, OpenProjectClient, WorkPackage};
///
/// let client = OpenProjectClient::from_env()?;
/// let wp = WorkPackage::create(&client, 3, NewWorkPackage::new("Fix login")).await?;
/// ```
#[async_trait]
pub trait Create: Sized {
    /// Parent the resource is created in.
    type Scope: Send;

    /// Body of the create request.
    type Params: Send;

    /// Create the resource and return it as stored by the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the resource or the request fails.
    async fn create(
        client: &OpenProjectClient,
        scope: Self::Scope,
        params: Self::Params,
    ) -> Result<Self>;
}
