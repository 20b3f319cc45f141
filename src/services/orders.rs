//! Order and payment reads, plus the admin-side order edits.
//!
//! The purchase workflow itself lives in [`CheckoutOrchestrator`](crate::lifecycle::CheckoutOrchestrator).

use crate::clients::{OrderClient, PaymentClient};
use crate::framework::{
    Ack, BoundMutation, Invalidation, ListParams, MutationExecutor, Operation, Query, ResourceKind,
    Transport,
};
use crate::model::{Order, OrderId, OrderUpdate, PaymentIntent};
use crate::services::{list_query, one_query, success_message};
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct OrderService {
    orders: OrderClient,
    payments: PaymentClient,
    mutations: MutationExecutor,
}

impl OrderService {
    pub fn new(transport: Arc<dyn Transport>, mutations: MutationExecutor) -> Self {
        Self {
            orders: OrderClient::new(Arc::clone(&transport)),
            payments: PaymentClient::new(transport),
            mutations,
        }
    }

    #[instrument(skip(self))]
    pub async fn orders(&self, params: ListParams) -> Query<Vec<Order>> {
        list_query(self.mutations.cache(), &self.orders, params).await
    }

    #[instrument(skip(self))]
    pub async fn order(&self, id: &OrderId) -> Query<Order> {
        let client = self.orders.clone();
        one_query(self.mutations.cache(), id, move |id| {
            let client = client.clone();
            async move { client.get_one(&id).await }
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn payments(&self, params: ListParams) -> Query<Vec<PaymentIntent>> {
        list_query(self.mutations.cache(), &self.payments, params).await
    }

    pub fn update_order(&self, id: OrderId, update: OrderUpdate) -> BoundMutation<Order> {
        let client = self.orders.clone();
        self.mutations
            .mutation(ResourceKind::Order, Operation::Update)
            .invalidates(Invalidation::Resource(ResourceKind::Order))
            .success_message(success_message(ResourceKind::Order, "updated"))
            .bind(async move { client.update(&id, update).await })
    }

    pub fn delete_order(&self, id: OrderId) -> BoundMutation<Ack> {
        let client = self.orders.clone();
        self.mutations
            .mutation(ResourceKind::Order, Operation::Remove)
            .invalidates(Invalidation::Resource(ResourceKind::Order))
            .success_message(success_message(ResourceKind::Order, "deleted"))
            .bind(async move { client.remove(&id).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::{Method, Notifier, QueryCache};
    use serde_json::json;
    use std::time::Duration;

    fn service(mock: &MockTransport) -> OrderService {
        OrderService::new(
            Arc::new(mock.clone()),
            MutationExecutor::new(QueryCache::new(), Notifier::default()),
        )
    }

    #[tokio::test]
    async fn test_identical_list_queries_share_one_call() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, "/order")
            .with_delay(Duration::from_millis(20))
            .return_json(json!([{ "id": "o_1", "status": "PENDING" }]));
        let orders = service(&mock);

        let params = ListParams::new().page(1);
        let (a, b) = tokio::join!(orders.orders(params.clone()), orders.orders(params));

        assert_eq!(mock.call_count(), 1);
        assert_eq!(a.data, b.data);
        assert_eq!(a.data.map(|o| o.len()), Some(1));
    }

    #[tokio::test]
    async fn test_update_order_refreshes_record() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, "/order/o_1")
            .return_json(json!({ "id": "o_1", "total": 10.0, "status": "PENDING" }));
        mock.expect(Method::Patch, "/order/o_1")
            .return_json(json!({ "id": "o_1", "total": 12.5, "status": "PENDING" }));
        mock.expect(Method::Get, "/order/o_1")
            .return_json(json!({ "id": "o_1", "total": 12.5, "status": "PENDING" }));
        let orders = service(&mock);
        let id = OrderId::from("o_1");

        orders.order(&id).await;
        orders
            .update_order(
                id.clone(),
                OrderUpdate {
                    total: Some(12.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let fresh = orders.order(&id).await;

        assert_eq!(fresh.data.map(|o| o.total), Some(12.5));
        mock.verify();
    }

    #[tokio::test]
    async fn test_failed_query_does_not_notify() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, "/payment").return_status(503, "maintenance");
        let orders = service(&mock);

        let query = orders.payments(ListParams::new()).await;

        assert!(query.is_error());
        assert_eq!(query.error.map(|e| e.to_string()), Some("Failed to fetch payment intents".into()));
        assert!(orders.mutations.notifier().active().is_empty());
    }

    #[tokio::test]
    async fn test_delete_order() {
        let mock = MockTransport::new();
        mock.expect(Method::Delete, "/order/o_2").return_json(json!({ "message": "ok" }));

        let ack = service(&mock).delete_order("o_2".into()).await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("ok"));
    }
}
