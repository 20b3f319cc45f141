//! # Catalog Service
//!
//! Tires, categories and tyre sizes: cached reads plus tracked writes.
//!
//! Invalidation per write:
//!
//! | Write | Invalidates |
//! |-------|-------------|
//! | create | every list of that resource |
//! | update / delete | every entry (lists and records) of that resource |

use crate::clients::{CategoryClient, TireClient, TyreSizeClient};
use crate::framework::{
    Ack, AdapterError, BoundMutation, Invalidation, ListParams, MutationExecutor, Operation, Query,
    ResourceKind, Transport,
};
use crate::model::{
    Category, CategoryCreate, CategoryId, CategoryUpdate, Tire, TireCreate, TireId, TireUpdate,
    TyreSize, TyreSizeCreate, TyreSizeId, TyreSizeUpdate,
};
use crate::services::{list_query, one_query, success_message};
use std::future::Future;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct CatalogService {
    tires: TireClient,
    categories: CategoryClient,
    sizes: TyreSizeClient,
    mutations: MutationExecutor,
}

impl CatalogService {
    pub fn new(transport: Arc<dyn Transport>, mutations: MutationExecutor) -> Self {
        Self {
            tires: TireClient::new(Arc::clone(&transport)),
            categories: CategoryClient::new(Arc::clone(&transport)),
            sizes: TyreSizeClient::new(transport),
            mutations,
        }
    }

    fn write<T, F>(&self, resource: ResourceKind, operation: Operation, call: F) -> BoundMutation<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, AdapterError>> + Send + 'static,
    {
        let (invalidation, verb) = match operation {
            Operation::Create => (Invalidation::Lists(resource), "created"),
            Operation::Remove => (Invalidation::Resource(resource), "deleted"),
            _ => (Invalidation::Resource(resource), "updated"),
        };
        self.mutations
            .mutation(resource, operation)
            .invalidates(invalidation)
            .success_message(success_message(resource, verb))
            .bind(call)
    }

    // =========================================================================
    // TIRES
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn tires(&self, params: ListParams) -> Query<Vec<Tire>> {
        list_query(self.mutations.cache(), &self.tires, params).await
    }

    #[instrument(skip(self))]
    pub async fn tire(&self, id: &TireId) -> Query<Tire> {
        let client = self.tires.clone();
        one_query(self.mutations.cache(), id, move |id| {
            let client = client.clone();
            async move { client.get_one(&id).await }
        })
        .await
    }

    pub fn create_tire(&self, tire: TireCreate) -> BoundMutation<Tire> {
        let client = self.tires.clone();
        self.write(ResourceKind::Tire, Operation::Create, async move {
            client.create(tire).await
        })
    }

    pub fn update_tire(&self, id: TireId, update: TireUpdate) -> BoundMutation<Tire> {
        let client = self.tires.clone();
        self.write(ResourceKind::Tire, Operation::Update, async move {
            client.update(&id, update).await
        })
    }

    pub fn delete_tire(&self, id: TireId) -> BoundMutation<Ack> {
        let client = self.tires.clone();
        self.write(ResourceKind::Tire, Operation::Remove, async move {
            client.remove(&id).await
        })
    }

    // =========================================================================
    // CATEGORIES
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn categories(&self, params: ListParams) -> Query<Vec<Category>> {
        list_query(self.mutations.cache(), &self.categories, params).await
    }

    pub fn create_category(&self, category: CategoryCreate) -> BoundMutation<Category> {
        let client = self.categories.clone();
        self.write(ResourceKind::Category, Operation::Create, async move {
            client.create(category).await
        })
    }

    pub fn update_category(&self, id: CategoryId, update: CategoryUpdate) -> BoundMutation<Category> {
        let client = self.categories.clone();
        self.write(ResourceKind::Category, Operation::Update, async move {
            client.update(&id, update).await
        })
    }

    pub fn delete_category(&self, id: CategoryId) -> BoundMutation<Ack> {
        let client = self.categories.clone();
        self.write(ResourceKind::Category, Operation::Remove, async move {
            client.remove(&id).await
        })
    }

    // =========================================================================
    // TYRE SIZES
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn tyre_sizes(&self, params: ListParams) -> Query<Vec<TyreSize>> {
        list_query(self.mutations.cache(), &self.sizes, params).await
    }

    pub fn create_tyre_size(&self, size: TyreSizeCreate) -> BoundMutation<TyreSize> {
        let client = self.sizes.clone();
        self.write(ResourceKind::TyreSize, Operation::Create, async move {
            client.create(size).await
        })
    }

    pub fn update_tyre_size(&self, id: TyreSizeId, update: TyreSizeUpdate) -> BoundMutation<TyreSize> {
        let client = self.sizes.clone();
        self.write(ResourceKind::TyreSize, Operation::Update, async move {
            client.update(&id, update).await
        })
    }

    pub fn delete_tyre_size(&self, id: TyreSizeId) -> BoundMutation<Ack> {
        let client = self.sizes.clone();
        self.write(ResourceKind::TyreSize, Operation::Remove, async move {
            client.remove(&id).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::{Method, Notifier, QueryCache, QueryStatus};
    use serde_json::json;

    fn service(mock: &MockTransport) -> CatalogService {
        CatalogService::new(
            Arc::new(mock.clone()),
            MutationExecutor::new(QueryCache::new(), Notifier::default()),
        )
    }

    #[tokio::test]
    async fn test_create_tire_invalidates_lists_and_notifies() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, "/tires").return_json(json!([]));
        mock.expect(Method::Post, "/tires")
            .return_json(json!({ "_id": "t_1", "name": "Alpin 6", "price": 110.0 }));
        mock.expect(Method::Get, "/tires")
            .return_json(json!([{ "_id": "t_1", "name": "Alpin 6", "price": 110.0 }]));
        let catalog = service(&mock);

        assert!(catalog.tires(ListParams::new()).await.data.unwrap().is_empty());
        catalog
            .create_tire(TireCreate::new("Alpin 6", "Michelin", 110.0, 4))
            .await
            .unwrap();
        let after = catalog.tires(ListParams::new()).await;

        assert_eq!(after.data.unwrap().len(), 1);
        assert_eq!(
            catalog.mutations.notifier().active()[0].message,
            "Tire created successfully"
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_empty_tire_id_is_disabled() {
        let mock = MockTransport::new();
        let query = service(&mock).tire(&TireId::default()).await;
        assert_eq!(query.status, QueryStatus::Idle);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_category_invalidates_records() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, "/categories")
            .return_json(json!([{ "_id": "c_1", "name": "Winter" }]));
        mock.expect(Method::Delete, "/categories/c_1").return_json(json!(null));
        let catalog = service(&mock);

        catalog.categories(ListParams::new()).await;
        catalog.delete_category("c_1".into()).await.unwrap();

        let key = crate::framework::QueryKey::list(ResourceKind::Category, &ListParams::new());
        assert!(catalog.mutations.cache().observe::<Vec<Category>>(&key).is_stale);
    }

    #[tokio::test]
    async fn test_failed_write_raises_error_notice() {
        let mock = MockTransport::new();
        mock.expect(Method::Patch, "/tiresizes/s_1").return_status(500, "boom");
        let catalog = service(&mock);

        let err = catalog
            .update_tyre_size("s_1".into(), TyreSizeUpdate::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to update tyre size");
        let notices = catalog.mutations.notifier().active();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_error());
    }
}
