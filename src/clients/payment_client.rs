use crate::clients::adapter_client::AdapterClient;
use crate::framework::{AdapterError, Method, Operation, ResourceAdapter, ResourceKind, Transport};
use crate::model::{PaymentCreate, PaymentIntent};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for the `/payment` endpoints. Intents can be created and listed, nothing else.
#[derive(Clone)]
pub struct PaymentClient {
    adapter: ResourceAdapter<PaymentIntent>,
}

impl PaymentClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            adapter: ResourceAdapter::new(transport),
        }
    }

    /// `POST /payment/create-payment-intent`
    ///
    /// The backend may answer with only a client secret; the order id and amount that were
    /// sent are filled in when missing from the answer.
    #[instrument(skip(self))]
    pub async fn create(&self, params: PaymentCreate) -> Result<PaymentIntent, AdapterError> {
        let path = format!("{}/create-payment-intent", ResourceKind::Payment.base_path());
        let mut intent: PaymentIntent = self
            .adapter
            .json_call(Operation::Create, Method::Post, path, &params)
            .await?;

        if intent.order_id.is_empty() {
            intent.order_id = params.order_id;
        }
        if intent.amount == 0.0 {
            intent.amount = params.amount;
        }
        if intent.currency.is_none() {
            intent.currency = params.currency;
        }
        debug!(order_id = %intent.order_id, "Payment intent created");
        Ok(intent)
    }
}

#[async_trait]
impl AdapterClient<PaymentIntent> for PaymentClient {
    fn adapter(&self) -> &ResourceAdapter<PaymentIntent> {
        &self.adapter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::{ListParams, TransportError};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_fills_missing_fields() {
        let mock = MockTransport::new();
        mock.expect(Method::Post, "/payment/create-payment-intent")
            .return_json(json!({ "clientSecret": "pi_1_secret_abc" }));

        let intent = PaymentClient::new(Arc::new(mock.clone()))
            .create(PaymentCreate::new("o_1".into(), 199.99))
            .await
            .unwrap();

        assert_eq!(intent.order_id.as_str(), "o_1");
        assert_eq!(intent.amount, 199.99);
        assert_eq!(intent.client_secret, "pi_1_secret_abc");

        let body = mock.calls()[0].body.clone().unwrap();
        assert_eq!(body.as_json(), Some(&json!({ "orderId": "o_1", "amount": 199.99 })));
    }

    #[tokio::test]
    async fn test_create_failure_message() {
        let mock = MockTransport::new();
        mock.expect(Method::Post, "/payment/create-payment-intent")
            .return_err(TransportError::Timeout);

        let err = PaymentClient::new(Arc::new(mock.clone()))
            .create(PaymentCreate::new("o_1".into(), 10.0))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to create payment intent");
        assert_eq!(err.cause, TransportError::Timeout);
    }

    #[tokio::test]
    async fn test_list() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, "/payment").return_json(json!({
            "data": [{ "id": "pi_1", "orderId": "o_1", "amount": 5.0, "clientSecret": "s" }]
        }));

        let intents = PaymentClient::new(Arc::new(mock.clone()))
            .list(&ListParams::new())
            .await
            .unwrap();
        assert_eq!(intents[0].id.as_str(), "pi_1");
    }
}
