use crate::framework::{AdapterError, ListParams, Resource, ResourceAdapter};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the operations every resource shares.
///
/// Each client decides which other operations it exposes (Payment has no update or
/// delete, Order has state-transition endpoints).
#[async_trait]
pub trait AdapterClient<R: Resource>: Send + Sync {
    /// Access the inner generic ResourceAdapter.
    fn adapter(&self) -> &ResourceAdapter<R>;

    /// Fetch a filtered, paginated collection.
    #[tracing::instrument(skip(self))]
    async fn list(&self, params: &ListParams) -> Result<Vec<R>, AdapterError> {
        tracing::debug!("Sending request");
        self.adapter().list(params).await
    }
}
