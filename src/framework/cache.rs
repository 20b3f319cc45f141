//! # Query Cache
//!
//! Process-wide memoization of read results, keyed by resource, scope and parameters.
//!
//! ## Guarantees
//!
//! - **One request per identity**: while a key is loading, further queries for the same key
//!   join the in-flight fetch instead of issuing another call.
//! - **Memoization**: a successful, non-stale entry is returned without touching the network.
//! - **Invalidation**: mutations mark entries stale; the next query re-fetches. An invalidation
//!   that lands while a fetch is in flight keeps the entry stale after that fetch settles.
//! - **Detached fetches**: the fetch runs in its own task, so an observer that stops waiting
//!   does not cancel it and the result is still recorded.
//!
//! There is no eviction or TTL. Concurrent fetches for the same resource but different keys
//! settle in whatever order the network answers (last settled wins).
//!
//! ## Typed storage
//!
//! Payloads are stored as `Arc<dyn Any + Send + Sync>` so one cache can hold tires, orders
//! and categories side by side. [`Query<T>`] downcasts on the way out; each key always holds
//! the same `T` because the key encodes resource and scope.

use crate::framework::error::{AdapterError, TransportError};
use crate::framework::params::ListParams;
use crate::framework::resource::{Operation, ResourceKind};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

// =============================================================================
// KEYS & STATUS
// =============================================================================

/// Whether a key addresses a collection or a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryScope {
    List,
    One,
}

/// Identity of a cached read: (resource, scope, parameters).
///
/// Parameters are compared as sorted key/value pairs, never as rendered text, so a value
/// containing `&` or `=` cannot alias another parameter set. A `One` key holds its id under `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: ResourceKind,
    pub scope: QueryScope,
    pub params: ListParams,
}

impl QueryKey {
    pub fn list(resource: ResourceKind, params: &ListParams) -> Self {
        Self {
            resource,
            scope: QueryScope::List,
            params: params.clone(),
        }
    }

    pub fn one(resource: ResourceKind, id: impl Display) -> Self {
        Self {
            resource,
            scope: QueryScope::One,
            params: ListParams::new().filter("id", id),
        }
    }

    fn operation(&self) -> Operation {
        match self.scope {
            QueryScope::List => Operation::List,
            QueryScope::One => Operation::GetOne,
        }
    }
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.scope {
            QueryScope::List => write!(f, "{}:list?{}", self.resource, self.params.canonical()),
            QueryScope::One => write!(
                f,
                "{}:one/{}",
                self.resource,
                self.params.get("id").unwrap_or_default()
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Which entries a successful mutation should mark stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    /// Exactly one entry.
    Key(QueryKey),
    /// Every list entry of a resource, whatever its parameters.
    Lists(ResourceKind),
    /// Every entry (lists and records) of a resource.
    Resource(ResourceKind),
    /// Everything.
    All,
}

impl Invalidation {
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            Invalidation::Key(target) => target == key,
            Invalidation::Lists(resource) => {
                key.resource == *resource && key.scope == QueryScope::List
            }
            Invalidation::Resource(resource) => key.resource == *resource,
            Invalidation::All => true,
        }
    }
}

// =============================================================================
// QUERY SNAPSHOT
// =============================================================================

type Payload = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<Payload, AdapterError>>>;

/// A re-runnable read: produces a fresh future for each fetch.
pub type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, AdapterError>> + Send + Sync>;

/// Build a [`Fetcher`] from a closure returning a future.
pub fn fetcher<T, F, Fut>(f: F) -> Fetcher<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, AdapterError>> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// What an observer sees for one key: status, last good data, last error.
///
/// `data` keeps the last successful payload even when the latest fetch failed.
pub struct Query<T> {
    pub key: QueryKey,
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<AdapterError>,
    pub is_stale: bool,
    refetch: Option<(QueryCache, Fetcher<T>)>,
}

impl<T: Clone + Send + Sync + 'static> Query<T> {
    /// A query that is never issued (e.g. `get_one` with an empty id).
    pub fn disabled(key: QueryKey) -> Self {
        Self {
            key,
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_stale: false,
            refetch: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// Mark this key stale and query it again. A fetch already in flight for the key is joined
    /// rather than duplicated, so its result may come back flagged stale. Disabled queries stay
    /// idle.
    pub async fn refetch(&self) -> Query<T> {
        match &self.refetch {
            Some((cache, fetch)) => {
                cache.invalidate(&Invalidation::Key(self.key.clone()));
                cache.query(self.key.clone(), Arc::clone(fetch)).await
            }
            None => Self::disabled(self.key.clone()),
        }
    }
}

impl<T: Clone> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_stale: self.is_stale,
            refetch: self
                .refetch
                .as_ref()
                .map(|(cache, fetch)| (cache.clone(), Arc::clone(fetch))),
        }
    }
}

impl<T: Debug> Debug for Query<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("key", &self.key)
            .field("status", &self.status)
            .field("data", &self.data)
            .field("error", &self.error)
            .field("is_stale", &self.is_stale)
            .finish()
    }
}

// =============================================================================
// THE CACHE
// =============================================================================

#[derive(Default)]
struct Entry {
    status: QueryStatus,
    data: Option<Payload>,
    error: Option<AdapterError>,
    stale: bool,
    /// Bumped on every invalidation; compared against the value captured when a fetch started.
    invalidations: u64,
    in_flight: Option<SharedFetch>,
}

/// Shared, cloneable handle to the process-wide query store.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Observe `key`, fetching only when there is no fresh result and no fetch in flight.
    pub async fn query<T>(&self, key: QueryKey, fetch: Fetcher<T>) -> Query<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let pending = {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_default();

            if let Some(in_flight) = &entry.in_flight {
                debug!(%key, "Joining in-flight query");
                in_flight.clone()
            } else if entry.status == QueryStatus::Success
                && !entry.stale
                && entry.data.as_ref().is_some_and(|d| d.is::<T>())
            {
                debug!(%key, "Cache hit");
                return self.snapshot(&key, entry, Some(fetch));
            } else {
                self.start_fetch(&key, entry, Arc::clone(&fetch))
            }
        };

        let result = pending.await;

        let entries = self.lock();
        let (stale, last_data) = entries
            .get(&key)
            .map(|e| (e.stale, e.data.clone()))
            .unwrap_or((false, None));

        let (status, data, error) = match result {
            Ok(payload) => (QueryStatus::Success, Some(payload), None),
            Err(e) => (QueryStatus::Error, last_data, Some(e)),
        };

        Query {
            key,
            status,
            data: data.and_then(|d| d.downcast_ref::<T>().cloned()),
            error,
            is_stale: stale,
            refetch: Some((self.clone(), fetch)),
        }
    }

    /// Current snapshot of `key` without fetching. Unknown keys read as `Idle`.
    pub fn observe<T>(&self, key: &QueryKey) -> Query<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.lock();
        match entries.get(key) {
            Some(entry) => self.snapshot(key, entry, None),
            None => Query::disabled(key.clone()),
        }
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        self.lock()
            .get(key)
            .map(|e| e.status)
            .unwrap_or(QueryStatus::Idle)
    }

    /// Mark every matching entry stale. Returns how many entries were touched.
    pub fn invalidate(&self, target: &Invalidation) -> usize {
        let mut entries = self.lock();
        let mut touched = 0;
        for (key, entry) in entries.iter_mut() {
            if target.matches(key) {
                entry.stale = true;
                entry.invalidations += 1;
                touched += 1;
                debug!(%key, "Invalidated");
            }
        }
        touched
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry. Fetches still in flight settle into nothing.
    pub fn clear(&self) {
        let mut entries = self.lock();
        let dropped = entries.len();
        entries.clear();
        info!(dropped, "Query cache cleared");
    }

    fn snapshot<T>(&self, key: &QueryKey, entry: &Entry, fetch: Option<Fetcher<T>>) -> Query<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        Query {
            key: key.clone(),
            status: entry.status,
            data: entry
                .data
                .as_ref()
                .and_then(|d| d.downcast_ref::<T>().cloned()),
            error: entry.error.clone(),
            is_stale: entry.stale,
            refetch: fetch.map(|f| (self.clone(), f)),
        }
    }

    fn start_fetch<T>(&self, key: &QueryKey, entry: &mut Entry, fetch: Fetcher<T>) -> SharedFetch
    where
        T: Clone + Send + Sync + 'static,
    {
        debug!(%key, "Fetching");
        entry.status = QueryStatus::Loading;
        let started_at = entry.invalidations;

        let cache = self.clone();
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let result = fetch().await.map(|value| Arc::new(value) as Payload);
            cache.settle(&task_key, started_at, &result);
            result
        });

        let cache = self.clone();
        let join_key = key.clone();
        let shared = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    let err = AdapterError::new(
                        join_key.resource,
                        join_key.operation(),
                        TransportError::Interrupted(e.to_string()),
                    );
                    let result = Err(err);
                    cache.settle(&join_key, started_at, &result);
                    result
                }
            }
        }
        .boxed()
        .shared();

        entry.in_flight = Some(shared.clone());
        shared
    }

    fn settle(&self, key: &QueryKey, started_at: u64, result: &Result<Payload, AdapterError>) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        entry.in_flight = None;
        entry.stale = entry.invalidations != started_at;
        match result {
            Ok(payload) => {
                entry.status = QueryStatus::Success;
                entry.data = Some(Arc::clone(payload));
                entry.error = None;
                debug!(%key, stale = entry.stale, "Query settled");
            }
            Err(e) => {
                entry.status = QueryStatus::Error;
                entry.error = Some(e.clone());
                debug!(%key, error = %e, "Query failed");
            }
        }
    }
}
