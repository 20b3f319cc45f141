use crate::framework::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

resource_id!(
    /// Backend identifier of an order.
    OrderId
);

/// Order state as reported by the backend.
///
/// The backend owns the state machine; unknown values are kept verbatim in `Other`
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// Whether a cancel button makes sense. Informational only: requests are never blocked on it.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Paid)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "PENDING" => OrderStatus::Pending,
            "PAID" => OrderStatus::Paid,
            "SHIPPED" => OrderStatus::Shipped,
            "DELIVERED" => OrderStatus::Delivered,
            "CANCELLED" | "CANCELED" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(raw),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub tire_id: String,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    #[serde(alias = "price")]
    pub unit_price: f64,
}

impl OrderItem {
    pub fn new(tire_id: impl Into<String>, name: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            tire_id: tire_id.into(),
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Contact and delivery details collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Resource for Order {
    const KIND: ResourceKind = ResourceKind::Order;

    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;

    fn id(&self) -> &OrderId {
        &self.id
    }
}

/// Payload for `POST /order`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub items: Vec<OrderItem>,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingInfo>,
}

impl OrderCreate {
    /// Build from cart lines; the total is the sum of line subtotals.
    pub fn new(items: Vec<OrderItem>) -> Self {
        let total = items.iter().map(OrderItem::subtotal).sum();
        Self {
            items,
            total,
            shipping: None,
        }
    }

    pub fn with_shipping(mut self, shipping: ShippingInfo) -> Self {
        self.shipping = Some(shipping);
        self
    }

    /// Override the computed total (discounts, shipping fees).
    pub fn with_total(mut self, total: f64) -> Self {
        self.total = total;
        self
    }
}

/// Field edits for `PATCH /order/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingInfo>,
}

/// Body of `PATCH /order/{id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: OrderStatus) -> Self {
        Self { status, note: None }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Body of `PATCH /order/{id}/cancel`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CancelInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CancelInfo {
    pub fn reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }
}

json_body!(OrderCreate, OrderUpdate);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_value(OrderStatus::Paid).unwrap(), json!("PAID"));
        let status: OrderStatus = serde_json::from_value(json!("cancelled")).unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: OrderStatus = serde_json::from_value(json!("REFUNDED")).unwrap();
        assert_eq!(status, OrderStatus::Other("REFUNDED".into()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("REFUNDED"));
        assert!(!status.can_cancel());
    }

    #[test]
    fn test_order_accepts_mongo_id() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o_1",
            "items": [{ "tireId": "t_1", "name": "Pilot Sport", "quantity": 4, "price": 49.99 }],
            "total": 199.96,
            "status": "PENDING",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(order.id.as_str(), "o_1");
        assert_eq!(order.items[0].unit_price, 49.99);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.shipping.is_none());
    }

    #[test]
    fn test_order_create_computes_total() {
        let create = OrderCreate::new(vec![
            OrderItem::new("t_1", "Winter", 2, 50.0),
            OrderItem::new("t_2", "Summer", 1, 99.99),
        ]);
        assert!((create.total - 199.99).abs() < 1e-9);

        let body = serde_json::to_value(&create).unwrap();
        assert_eq!(body["items"][0]["tireId"], json!("t_1"));
        assert!(body.get("shipping").is_none());
    }

    #[test]
    fn test_transition_bodies() {
        let body = serde_json::to_value(StatusUpdate::new(OrderStatus::Paid)).unwrap();
        assert_eq!(body, json!({ "status": "PAID" }));
        let body = serde_json::to_value(CancelInfo::reason("out of stock")).unwrap();
        assert_eq!(body, json!({ "reason": "out of stock" }));
    }
}
