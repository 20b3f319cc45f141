//! # Resource Abstraction
//!
//! Every remote entity the storefront talks to (Order, Payment, Tire, Category, TyreSize)
//! implements [`Resource`]. The trait pins down, at compile time, which payload types a
//! resource accepts for create and update, so a `TireCreate` can never be posted to the
//! orders endpoint.
//!
//! [`ResourceKind`] and [`Operation`] are the runtime tags used for cache keys, log fields
//! and the fixed user-facing failure messages.

use crate::framework::transport::IntoRequestBody;
use serde::de::DeserializeOwned;
use std::fmt::{Debug, Display};

/// The five resource families exposed by the storefront API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Order,
    Payment,
    Tire,
    Category,
    TyreSize,
}

impl ResourceKind {
    /// Collection path on the API, without trailing slash.
    pub fn base_path(&self) -> &'static str {
        match self {
            ResourceKind::Order => "/order",
            ResourceKind::Payment => "/payment",
            ResourceKind::Tire => "/tires",
            ResourceKind::Category => "/categories",
            ResourceKind::TyreSize => "/tiresizes",
        }
    }

    /// Human label for one record, used in messages.
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Order => "order",
            ResourceKind::Payment => "payment intent",
            ResourceKind::Tire => "tire",
            ResourceKind::Category => "category",
            ResourceKind::TyreSize => "tyre size",
        }
    }

    /// Human label for a collection, used in messages.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Order => "orders",
            ResourceKind::Payment => "payment intents",
            ResourceKind::Tire => "tires",
            ResourceKind::Category => "categories",
            ResourceKind::TyreSize => "tyre sizes",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Order => "order",
            ResourceKind::Payment => "payment",
            ResourceKind::Tire => "tire",
            ResourceKind::Category => "category",
            ResourceKind::TyreSize => "tyre_size",
        };
        f.write_str(name)
    }
}

/// The kind of call made against a resource.
///
/// `UpdateStatus` and `Cancel` are separate from `Update` because the backend exposes them as
/// dedicated state-transition endpoints rather than field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Remove,
    GetOne,
    List,
    UpdateStatus,
    Cancel,
}

impl Operation {
    /// The fixed message surfaced to users when this operation fails.
    pub fn failure_message(&self, resource: ResourceKind) -> String {
        match self {
            Operation::Create => format!("Failed to create {}", resource.singular()),
            Operation::Update => format!("Failed to update {}", resource.singular()),
            Operation::Remove => format!("Failed to delete {}", resource.singular()),
            Operation::GetOne => format!("Failed to fetch {}", resource.singular()),
            Operation::List => format!("Failed to fetch {}", resource.plural()),
            Operation::UpdateStatus => format!("Failed to update {} status", resource.singular()),
            Operation::Cancel => format!("Failed to cancel {}", resource.singular()),
        }
    }
}

/// Contract for a record type served by the storefront API.
///
/// # Associated Types
/// - `Id`: the backend identifier, rendered into paths with `Display`.
/// - `Create` / `Update`: write payloads. They choose their own wire encoding through
///   [`IntoRequestBody`] (JSON for most resources, multipart for resources carrying images).
///
/// Resources without an update endpoint use [`std::convert::Infallible`] as `Update`.
pub trait Resource: DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    const KIND: ResourceKind;

    type Id: Display + Debug + Clone + Send + Sync + 'static;
    type Create: IntoRequestBody + Debug + Send + 'static;
    type Update: IntoRequestBody + Debug + Send + 'static;

    fn id(&self) -> &Self::Id;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            Operation::Create.failure_message(ResourceKind::Order),
            "Failed to create order"
        );
        assert_eq!(
            Operation::List.failure_message(ResourceKind::Tire),
            "Failed to fetch tires"
        );
        assert_eq!(
            Operation::UpdateStatus.failure_message(ResourceKind::Order),
            "Failed to update order status"
        );
        assert_eq!(
            Operation::Create.failure_message(ResourceKind::Payment),
            "Failed to create payment intent"
        );
        assert_eq!(
            Operation::Remove.failure_message(ResourceKind::TyreSize),
            "Failed to delete tyre size"
        );
    }

    #[test]
    fn test_base_paths() {
        assert_eq!(ResourceKind::TyreSize.base_path(), "/tiresizes");
        assert_eq!(ResourceKind::Category.base_path(), "/categories");
        assert_eq!(ResourceKind::Order.base_path(), "/order");
    }
}
