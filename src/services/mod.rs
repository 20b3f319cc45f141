//! Query and mutation entry points the presentation layer calls.
//!
//! Reads go through the shared [`QueryCache`]; writes are handed out as
//! [`BoundMutation`](crate::framework::BoundMutation)s that already know which entries
//! they invalidate and which success notice they raise.

pub mod catalog;
pub mod orders;

pub use catalog::CatalogService;
pub use orders::OrderService;

use crate::clients::AdapterClient;
use crate::framework::{
    fetcher, AdapterError, ListParams, Query, QueryCache, QueryKey, Resource, ResourceKind,
};
use std::future::Future;

/// Cached `list` for any resource client.
pub(crate) async fn list_query<R, C>(cache: &QueryCache, client: &C, params: ListParams) -> Query<Vec<R>>
where
    R: Resource,
    C: AdapterClient<R> + Clone + 'static,
{
    let key = QueryKey::list(R::KIND, &params);
    let client = client.clone();
    cache
        .query(
            key,
            fetcher(move || {
                let client = client.clone();
                let params = params.clone();
                async move { client.list(&params).await }
            }),
        )
        .await
}

/// Cached single-record read. An empty id yields a disabled, idle query.
pub(crate) async fn one_query<R, F, Fut>(cache: &QueryCache, id: &R::Id, fetch: F) -> Query<R>
where
    R: Resource,
    F: Fn(R::Id) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, AdapterError>> + Send + 'static,
{
    let key = QueryKey::one(R::KIND, id);
    if id.to_string().trim().is_empty() {
        return Query::disabled(key);
    }
    let id = id.clone();
    cache.query(key, fetcher(move || fetch(id.clone()))).await
}

/// "Tire created successfully", "Tyre size deleted successfully", ...
pub(crate) fn success_message(resource: ResourceKind, verb: &str) -> String {
    let label = resource.singular();
    let mut chars = label.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{} {} successfully", capitalized, verb)
}
