use crate::clients::adapter_client::AdapterClient;
use crate::framework::{Ack, AdapterError, ResourceAdapter, Transport};
use crate::model::{Category, CategoryCreate, CategoryId, CategoryUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Client for the `/categories` endpoints (multipart writes with a logo).
#[derive(Clone)]
pub struct CategoryClient {
    adapter: ResourceAdapter<Category>,
}

impl CategoryClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            adapter: ResourceAdapter::new(transport),
        }
    }

    #[instrument(skip(self, category), fields(name = %category.name))]
    pub async fn create(&self, category: CategoryCreate) -> Result<Category, AdapterError> {
        self.adapter.create(category).await
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: &CategoryId, update: CategoryUpdate) -> Result<Category, AdapterError> {
        self.adapter.update(id, update).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: &CategoryId) -> Result<Ack, AdapterError> {
        self.adapter.remove(id).await
    }
}

#[async_trait]
impl AdapterClient<Category> for CategoryClient {
    fn adapter(&self) -> &ResourceAdapter<Category> {
        &self.adapter
    }
}
