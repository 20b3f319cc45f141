use crate::clients::adapter_client::AdapterClient;
use crate::framework::{Ack, AdapterError, ResourceAdapter, Transport};
use crate::model::{Tire, TireCreate, TireId, TireUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for the `/tires` endpoints (multipart writes).
#[derive(Clone)]
pub struct TireClient {
    adapter: ResourceAdapter<Tire>,
}

impl TireClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            adapter: ResourceAdapter::new(transport),
        }
    }

    #[instrument(skip(self, tire), fields(name = %tire.name))]
    pub async fn create(&self, tire: TireCreate) -> Result<Tire, AdapterError> {
        debug!(has_image = tire.image.is_some(), "Sending request");
        self.adapter.create(tire).await
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: &TireId, update: TireUpdate) -> Result<Tire, AdapterError> {
        self.adapter.update(id, update).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: &TireId) -> Result<Ack, AdapterError> {
        self.adapter.remove(id).await
    }

    #[instrument(skip(self))]
    pub async fn get_one(&self, id: &TireId) -> Result<Tire, AdapterError> {
        self.adapter.get_one(id).await
    }
}

#[async_trait]
impl AdapterClient<Tire> for TireClient {
    fn adapter(&self) -> &ResourceAdapter<Tire> {
        &self.adapter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::{Method, TransportError, Upload};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_sends_multipart() {
        let mock = MockTransport::new();
        mock.expect(Method::Post, "/tires").return_json(json!({
            "_id": "t_1", "name": "CrossClimate 2", "brand": "Michelin", "price": 140.0, "stock": 8
        }));

        let tire = TireClient::new(Arc::new(mock.clone()))
            .create(
                TireCreate::new("CrossClimate 2", "Michelin", 140.0, 8)
                    .image(Upload::new("cc2.webp", "image/webp", vec![1, 2, 3, 4])),
            )
            .await
            .unwrap();

        assert_eq!(tire.id.as_str(), "t_1");
        let body = mock.calls()[0].body.clone().unwrap();
        let form = body.as_form().expect("multipart body");
        assert_eq!(form.field("brand"), Some("Michelin"));
        assert!(form.upload("image").is_some());
    }

    #[tokio::test]
    async fn test_create_failure_has_fixed_message() {
        let mock = MockTransport::new();
        mock.expect(Method::Post, "/tires")
            .return_err(TransportError::Network("connection reset".into()));

        let err = TireClient::new(Arc::new(mock.clone()))
            .create(TireCreate::new("X", "Y", 1.0, 1))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to create tire");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_update_patches_record_path() {
        let mock = MockTransport::new();
        mock.expect(Method::Patch, "/tires/t_1")
            .return_json(json!({ "id": "t_1", "name": "Pilot", "price": 99.0, "stock": 2 }));
        mock.expect(Method::Delete, "/tires/t_1").return_json(json!(null));

        let tires = TireClient::new(Arc::new(mock.clone()));
        let id = TireId::from("t_1");
        let updated = tires
            .update(
                &id,
                TireUpdate {
                    stock: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.stock, 2);
        assert_eq!(tires.remove(&id).await.unwrap().message, None);
        mock.verify();
    }
}
