use crate::clients::adapter_client::AdapterClient;
use crate::framework::{Ack, AdapterError, Method, Operation, ResourceAdapter, Transport};
use crate::model::{CancelInfo, Order, OrderCreate, OrderId, OrderUpdate, StatusUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for the `/order` endpoints.
///
/// Status changes and cancellation go through their own endpoints; the backend decides
/// whether a transition is legal, nothing is checked here.
#[derive(Clone)]
pub struct OrderClient {
    adapter: ResourceAdapter<Order>,
}

impl OrderClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            adapter: ResourceAdapter::new(transport),
        }
    }

    #[instrument(skip(self, order))]
    pub async fn create(&self, order: OrderCreate) -> Result<Order, AdapterError> {
        debug!(items = order.items.len(), total = order.total, "Sending request");
        self.adapter.create(order).await
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: &OrderId, update: OrderUpdate) -> Result<Order, AdapterError> {
        debug!(?update, "Sending request");
        self.adapter.update(id, update).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: &OrderId) -> Result<Ack, AdapterError> {
        self.adapter.remove(id).await
    }

    #[instrument(skip(self))]
    pub async fn get_one(&self, id: &OrderId) -> Result<Order, AdapterError> {
        self.adapter.get_one(id).await
    }

    /// `PATCH /order/{id}/status`
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &OrderId, info: StatusUpdate) -> Result<Order, AdapterError> {
        let path = format!("{}/status", self.adapter.record_path(id));
        self.adapter
            .json_call(Operation::UpdateStatus, Method::Patch, path, &info)
            .await
    }

    /// `PATCH /order/{id}/cancel`
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: &OrderId, info: CancelInfo) -> Result<Order, AdapterError> {
        let path = format!("{}/cancel", self.adapter.record_path(id));
        self.adapter
            .json_call(Operation::Cancel, Method::Patch, path, &info)
            .await
    }
}

#[async_trait]
impl AdapterClient<Order> for OrderClient {
    fn adapter(&self) -> &ResourceAdapter<Order> {
        &self.adapter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::ListParams;
    use crate::model::{OrderItem, OrderStatus};
    use serde_json::json;

    fn client(mock: &MockTransport) -> OrderClient {
        OrderClient::new(Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_create_posts_json() {
        let mock = MockTransport::new();
        mock.expect(Method::Post, "/order").return_json(json!({
            "data": { "_id": "o_1", "total": 199.99, "status": "PENDING" }
        }));

        let order = client(&mock)
            .create(OrderCreate::new(vec![OrderItem::new("t_1", "Primacy", 1, 199.99)]))
            .await
            .unwrap();

        assert_eq!(order.id.as_str(), "o_1");
        assert_eq!(order.status, OrderStatus::Pending);
        let sent = &mock.calls()[0];
        let body = sent.body.as_ref().and_then(|b| b.as_json()).unwrap();
        assert_eq!(body["total"], json!(199.99));
        mock.verify();
    }

    #[tokio::test]
    async fn test_transitions_use_dedicated_endpoints() {
        let mock = MockTransport::new();
        mock.expect(Method::Patch, "/order/o_1/status")
            .return_json(json!({ "id": "o_1", "status": "PAID" }));
        mock.expect(Method::Patch, "/order/o_1/cancel")
            .return_json(json!({ "id": "o_1", "status": "CANCELLED" }));
        let orders = client(&mock);
        let id = OrderId::from("o_1");

        let paid = orders
            .update_status(&id, StatusUpdate::new(OrderStatus::Paid))
            .await
            .unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);

        let cancelled = orders
            .cancel(&id, CancelInfo::reason("changed my mind"))
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        mock.verify();
    }

    #[tokio::test]
    async fn test_cancel_unknown_order_keeps_cause() {
        let mock = MockTransport::new();
        mock.expect(Method::Patch, "/order/missing/cancel")
            .return_status(404, "Order not found");

        let err = client(&mock)
            .cancel(&"missing".into(), CancelInfo::reason("out of stock"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to cancel order");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_sends_params() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, "/order").return_json(json!([
            { "id": "o_1", "status": "SHIPPED" },
            { "id": "o_2", "status": "PENDING" }
        ]));

        let orders = client(&mock)
            .list(&ListParams::new().page(1).filter("status", "SHIPPED"))
            .await
            .unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(
            mock.calls()[0].query,
            vec![
                ("page".to_string(), "1".to_string()),
                ("status".to_string(), "SHIPPED".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_and_get_one() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, "/order/o_9")
            .return_json(json!({ "id": "o_9", "status": "DELIVERED" }));
        mock.expect(Method::Delete, "/order/o_9")
            .return_json(json!({ "message": "Order deleted" }));
        let orders = client(&mock);
        let id = OrderId::from("o_9");

        assert!(orders.get_one(&id).await.unwrap().status.is_terminal());
        let ack = orders.remove(&id).await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("Order deleted"));
    }
}
