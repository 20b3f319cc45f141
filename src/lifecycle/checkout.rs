//! # Order Lifecycle
//!
//! Sequences the purchase workflow against the backend, which owns the order state machine:
//!
//! ```text
//! CREATED ──create_order──▶ PENDING ──(external payment)──▶ PAID ──▶ SHIPPED ──▶ DELIVERED
//!                              │                              │
//!                              └──────────cancel──────────────┴──▶ CANCELLED
//! ```
//!
//! - Every step is a tracked [`Mutation`](crate::framework::Mutation); steps never run in parallel.
//! - Transitions are only *requested*. Whatever the backend answers is the new local view,
//!   and nothing is validated or retried here.
//! - A failed step aborts the sequence. An order that was persisted before a payment
//!   failure stays `PENDING`; the caller gets it back inside
//!   [`CheckoutError::PaymentFailed`] and decides whether to [`retry_payment`] or
//!   [`cancel`].
//! - The `PENDING → PAID` flip happens outside this crate (payment confirmation); it is
//!   observed with [`refresh_order`].
//!
//! [`retry_payment`]: CheckoutOrchestrator::retry_payment
//! [`cancel`]: CheckoutOrchestrator::cancel
//! [`refresh_order`]: CheckoutOrchestrator::refresh_order

use crate::clients::{OrderClient, PaymentClient};
use crate::framework::{
    AdapterError, BoundMutation, Invalidation, MutationExecutor, Operation, Query, QueryKey,
    ResourceKind, Transport,
};
use crate::model::{CancelInfo, Order, OrderCreate, OrderId, PaymentCreate, PaymentIntent, StatusUpdate};
use crate::services::{one_query, success_message};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// A persisted order together with the payment intent opened for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub order: Order,
    pub payment: PaymentIntent,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing was persisted.
    #[error("{0}")]
    OrderFailed(#[source] AdapterError),

    /// The order exists (still `PENDING`) but no payment intent was opened.
    #[error("{source}")]
    PaymentFailed {
        order: Box<Order>,
        #[source]
        source: AdapterError,
    },
}

impl CheckoutError {
    /// The order left behind by a partial checkout.
    pub fn order(&self) -> Option<&Order> {
        match self {
            CheckoutError::OrderFailed(_) => None,
            CheckoutError::PaymentFailed { order, .. } => Some(order),
        }
    }

    pub fn adapter_error(&self) -> &AdapterError {
        match self {
            CheckoutError::OrderFailed(err) => err,
            CheckoutError::PaymentFailed { source, .. } => source,
        }
    }
}

#[derive(Clone)]
pub struct CheckoutOrchestrator {
    orders: OrderClient,
    payments: PaymentClient,
    mutations: MutationExecutor,
}

impl CheckoutOrchestrator {
    pub fn new(transport: Arc<dyn Transport>, mutations: MutationExecutor) -> Self {
        Self {
            orders: OrderClient::new(Arc::clone(&transport)),
            payments: PaymentClient::new(transport),
            mutations,
        }
    }

    // =========================================================================
    // Single steps
    // =========================================================================

    /// Persist a cart. The backend answers with a `PENDING` order.
    pub fn create_order(&self, order: OrderCreate) -> BoundMutation<Order> {
        let client = self.orders.clone();
        self.mutations
            .mutation(ResourceKind::Order, Operation::Create)
            .invalidates(Invalidation::Resource(ResourceKind::Order))
            .success_message(success_message(ResourceKind::Order, "created"))
            .bind(async move { client.create(order).await })
    }

    /// Open a payment intent for `{orderId, amount}`.
    ///
    /// Opening a second intent for an order that already has one is the caller's mistake;
    /// it is not prevented here.
    pub fn create_payment_intent(&self, params: PaymentCreate) -> BoundMutation<PaymentIntent> {
        let client = self.payments.clone();
        let order_key = QueryKey::one(ResourceKind::Order, &params.order_id);
        self.mutations
            .mutation(ResourceKind::Payment, Operation::Create)
            .invalidates(Invalidation::Lists(ResourceKind::Payment))
            .invalidates(Invalidation::Key(order_key))
            .bind(async move { client.create(params).await })
    }

    /// Ask the backend to move the order to `info.status`. The backend decides legality.
    pub fn update_status(&self, id: OrderId, info: StatusUpdate) -> BoundMutation<Order> {
        let client = self.orders.clone();
        self.mutations
            .mutation(ResourceKind::Order, Operation::UpdateStatus)
            .invalidates(Invalidation::Resource(ResourceKind::Order))
            .success_message("Order status updated successfully")
            .bind(async move { client.update_status(&id, info).await })
    }

    /// Ask the backend to cancel. Cancelling twice is whatever the backend makes of it.
    pub fn cancel(&self, id: OrderId, info: CancelInfo) -> BoundMutation<Order> {
        let client = self.orders.clone();
        self.mutations
            .mutation(ResourceKind::Order, Operation::Cancel)
            .invalidates(Invalidation::Resource(ResourceKind::Order))
            .success_message(success_message(ResourceKind::Order, "cancelled"))
            .bind(async move { client.cancel(&id, info).await })
    }

    /// Re-read an order from the backend, bypassing any cached copy.
    #[instrument(skip(self))]
    pub async fn refresh_order(&self, id: &OrderId) -> Query<Order> {
        let cache = self.mutations.cache();
        cache.invalidate(&Invalidation::Key(QueryKey::one(ResourceKind::Order, id)));
        let client = self.orders.clone();
        one_query(cache, id, move |id| {
            let client = client.clone();
            async move { client.get_one(&id).await }
        })
        .await
    }

    // =========================================================================
    // Workflow
    // =========================================================================

    /// Create the order, then open a payment intent for its full total.
    #[instrument(skip(self, order), fields(items = order.items.len(), total = order.total))]
    pub async fn checkout(&self, order: OrderCreate) -> Result<Checkout, CheckoutError> {
        let order = self
            .create_order(order)
            .await
            .map_err(CheckoutError::OrderFailed)?;
        info!(order_id = %order.id, status = %order.status, "Order persisted");

        match self.retry_payment(&order).await {
            Ok(payment) => {
                info!(order_id = %order.id, "Payment intent opened");
                Ok(Checkout { order, payment })
            }
            Err(source) => {
                warn!(order_id = %order.id, error = %source, "Payment step failed, order left pending");
                Err(CheckoutError::PaymentFailed {
                    order: Box::new(order),
                    source,
                })
            }
        }
    }

    /// Open a (new) payment intent for an order that is already persisted.
    pub async fn retry_payment(&self, order: &Order) -> Result<PaymentIntent, AdapterError> {
        self.create_payment_intent(PaymentCreate::for_order(order)).await
    }
}
