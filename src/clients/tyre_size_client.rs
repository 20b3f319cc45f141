use crate::clients::adapter_client::AdapterClient;
use crate::framework::{Ack, AdapterError, ResourceAdapter, Transport};
use crate::model::{TyreSize, TyreSizeCreate, TyreSizeId, TyreSizeUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Client for the `/tiresizes` endpoints.
#[derive(Clone)]
pub struct TyreSizeClient {
    adapter: ResourceAdapter<TyreSize>,
}

impl TyreSizeClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            adapter: ResourceAdapter::new(transport),
        }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, size: TyreSizeCreate) -> Result<TyreSize, AdapterError> {
        self.adapter.create(size).await
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: &TyreSizeId, update: TyreSizeUpdate) -> Result<TyreSize, AdapterError> {
        self.adapter.update(id, update).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: &TyreSizeId) -> Result<Ack, AdapterError> {
        self.adapter.remove(id).await
    }
}

#[async_trait]
impl AdapterClient<TyreSize> for TyreSizeClient {
    fn adapter(&self) -> &ResourceAdapter<TyreSize> {
        &self.adapter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_sends_json() {
        let mock = MockTransport::new();
        mock.expect(Method::Post, "/tiresizes").return_json(json!({
            "_id": "s_1", "width": 225, "aspectRatio": 45, "rimDiameter": 17
        }));

        let size = TyreSizeClient::new(Arc::new(mock.clone()))
            .create(TyreSizeCreate::new(225, 45, 17))
            .await
            .unwrap();

        assert_eq!(size.display_label(), "225/45 R17");
        let body = mock.calls()[0].body.clone().unwrap();
        assert_eq!(
            body.as_json(),
            Some(&json!({ "width": 225, "aspectRatio": 45, "rimDiameter": 17 }))
        );
    }

    #[tokio::test]
    async fn test_update_validation_error() {
        let mock = MockTransport::new();
        mock.expect(Method::Patch, "/tiresizes/s_1")
            .return_status(422, "width must be positive");

        let err = TyreSizeClient::new(Arc::new(mock.clone()))
            .update(
                &"s_1".into(),
                TyreSizeUpdate {
                    width: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Failed to update tyre size");
    }
}
