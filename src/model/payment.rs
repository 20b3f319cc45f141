use crate::framework::{Resource, ResourceKind};
use crate::model::order::{Order, OrderId};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

resource_id!(PaymentId);

/// Backend handle for an in-progress payment attempt on one order.
///
/// The create endpoint may answer with little more than a client secret, so everything
/// except `client_secret` tolerates being absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    #[serde(default, alias = "_id", alias = "paymentIntentId")]
    pub id: PaymentId,
    #[serde(default)]
    pub order_id: OrderId,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Resource for PaymentIntent {
    const KIND: ResourceKind = ResourceKind::Payment;

    type Id = PaymentId;
    type Create = PaymentCreate;
    // Intents are never edited from the storefront.
    type Update = Infallible;

    fn id(&self) -> &PaymentId {
        &self.id
    }
}

/// Body of `POST /payment/create-payment-intent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreate {
    pub order_id: OrderId,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl PaymentCreate {
    pub fn new(order_id: OrderId, amount: f64) -> Self {
        Self {
            order_id,
            amount,
            currency: None,
        }
    }

    /// Pay the full total of a persisted order.
    pub fn for_order(order: &Order) -> Self {
        Self::new(order.id.clone(), order.total)
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

json_body!(PaymentCreate);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_create_body() {
        let body = serde_json::to_value(PaymentCreate::new("o_1".into(), 199.99)).unwrap();
        assert_eq!(body, json!({ "orderId": "o_1", "amount": 199.99 }));
    }

    #[test]
    fn test_minimal_intent_decodes() {
        let intent: PaymentIntent =
            serde_json::from_value(json!({ "clientSecret": "pi_1_secret" })).unwrap();
        assert_eq!(intent.client_secret, "pi_1_secret");
        assert!(intent.order_id.is_empty());
    }
}
