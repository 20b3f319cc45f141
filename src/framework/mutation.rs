//! # Mutation Executor
//!
//! A [`Mutation`] is a single-use, tracked write:
//!
//! ```text
//! Idle ──execute──▶ Pending ──▶ Success ──▶ invalidate, notify, on_success
//!                          └──▶ Error   ──▶ on_error (or an error notice)
//! ```
//!
//! `execute` consumes the mutation, so a request can never be replayed. Exactly one call is
//! awaited and there is no retry. Handlers run before the result is handed back to the caller.
//!
//! Services hand out a [`BoundMutation`]: the same builder already paired with its adapter
//! call, which the caller can configure further and then simply `.await`.

use crate::framework::cache::{Invalidation, QueryCache};
use crate::framework::error::AdapterError;
use crate::framework::notify::Notifier;
use crate::framework::resource::{Operation, ResourceKind};
use futures::future::{BoxFuture, FutureExt};
use std::future::{Future, IntoFuture};
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

impl MutationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MutationStatus::Success | MutationStatus::Error)
    }
}

type SuccessHandler<T> = Box<dyn FnOnce(&T) + Send>;
type ErrorHandler = Box<dyn FnOnce(&AdapterError) + Send>;

/// Tracked write for one `(resource, operation)` pair.
pub struct Mutation<T> {
    resource: ResourceKind,
    operation: Operation,
    notifier: Notifier,
    cache: QueryCache,
    invalidations: Vec<Invalidation>,
    success_message: Option<String>,
    on_success: Option<SuccessHandler<T>>,
    on_error: Option<ErrorHandler>,
    status: watch::Sender<MutationStatus>,
}

impl<T: Send + 'static> Mutation<T> {
    pub fn new(
        resource: ResourceKind,
        operation: Operation,
        notifier: Notifier,
        cache: QueryCache,
    ) -> Self {
        let (status, _) = watch::channel(MutationStatus::Idle);
        Self {
            resource,
            operation,
            notifier,
            cache,
            invalidations: Vec::new(),
            success_message: None,
            on_success: None,
            on_error: None,
            status,
        }
    }

    pub fn resource(&self) -> ResourceKind {
        self.resource
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn status(&self) -> MutationStatus {
        *self.status.borrow()
    }

    /// Watch the status transitions of this mutation.
    pub fn subscribe(&self) -> watch::Receiver<MutationStatus> {
        self.status.subscribe()
    }

    pub fn on_success(mut self, handler: impl FnOnce(&T) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(handler));
        self
    }

    /// Replaces the default error path (an error notice with the fixed message).
    pub fn on_error(mut self, handler: impl FnOnce(&AdapterError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    /// Cache entries to mark stale once the write succeeds. May be called repeatedly.
    pub fn invalidates(mut self, target: Invalidation) -> Self {
        self.invalidations.push(target);
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    /// Pair this mutation with the call it will run.
    pub fn bind<F>(self, call: F) -> BoundMutation<T>
    where
        F: Future<Output = Result<T, AdapterError>> + Send + 'static,
    {
        BoundMutation {
            mutation: self,
            call: call.boxed(),
        }
    }

    /// Run `call` once and drive the mutation to a terminal state.
    pub async fn execute<F>(self, call: F) -> Result<T, AdapterError>
    where
        F: Future<Output = Result<T, AdapterError>> + Send,
    {
        let Mutation {
            resource,
            operation,
            notifier,
            cache,
            invalidations,
            success_message,
            on_success,
            on_error,
            status,
        } = self;

        status.send_replace(MutationStatus::Pending);
        debug!(%resource, ?operation, "Mutation pending");

        match call.await {
            Ok(value) => {
                let touched: usize = invalidations.iter().map(|t| cache.invalidate(t)).sum();
                status.send_replace(MutationStatus::Success);
                info!(%resource, ?operation, invalidated = touched, "Mutation succeeded");

                if let Some(message) = success_message {
                    notifier.notify_success(message);
                }
                if let Some(handler) = on_success {
                    handler(&value);
                }
                Ok(value)
            }
            Err(err) => {
                status.send_replace(MutationStatus::Error);
                match on_error {
                    Some(handler) => handler(&err),
                    None => {
                        notifier.notify_error(err.message());
                    }
                }
                Err(err)
            }
        }
    }
}

/// A [`Mutation`] together with its pending adapter call. Await it to execute.
pub struct BoundMutation<T> {
    mutation: Mutation<T>,
    call: BoxFuture<'static, Result<T, AdapterError>>,
}

impl<T: Send + 'static> BoundMutation<T> {
    pub fn on_success(mut self, handler: impl FnOnce(&T) + Send + 'static) -> Self {
        self.mutation = self.mutation.on_success(handler);
        self
    }

    pub fn on_error(mut self, handler: impl FnOnce(&AdapterError) + Send + 'static) -> Self {
        self.mutation = self.mutation.on_error(handler);
        self
    }

    pub fn invalidates(mut self, target: Invalidation) -> Self {
        self.mutation = self.mutation.invalidates(target);
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.mutation = self.mutation.success_message(message);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationStatus> {
        self.mutation.subscribe()
    }

    pub fn status(&self) -> MutationStatus {
        self.mutation.status()
    }
}

impl<T: Send + 'static> IntoFuture for BoundMutation<T> {
    type Output = Result<T, AdapterError>;
    type IntoFuture = BoxFuture<'static, Result<T, AdapterError>>;

    fn into_future(self) -> Self::IntoFuture {
        let BoundMutation { mutation, call } = self;
        mutation.execute(call).boxed()
    }
}

/// Factory for mutations sharing one cache and notifier.
#[derive(Clone)]
pub struct MutationExecutor {
    cache: QueryCache,
    notifier: Notifier,
}

impl MutationExecutor {
    pub fn new(cache: QueryCache, notifier: Notifier) -> Self {
        Self { cache, notifier }
    }

    pub fn mutation<T: Send + 'static>(
        &self,
        resource: ResourceKind,
        operation: Operation,
    ) -> Mutation<T> {
        Mutation::new(
            resource,
            operation,
            self.notifier.clone(),
            self.cache.clone(),
        )
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::cache::{fetcher, QueryKey};
    use crate::framework::error::TransportError;
    use crate::framework::notify::NoticeLevel;
    use crate::framework::params::ListParams;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn executor() -> MutationExecutor {
        MutationExecutor::new(QueryCache::new(), Notifier::default())
    }

    fn create_failure() -> AdapterError {
        AdapterError::new(
            ResourceKind::Tire,
            Operation::Create,
            TransportError::Network("connection refused".into()),
        )
    }

    #[tokio::test]
    async fn test_success_invalidates_notifies_and_calls_handler() {
        let exec = executor();
        let key = QueryKey::list(ResourceKind::Tire, &ListParams::new());
        exec.cache()
            .query(key.clone(), fetcher(|| async { Ok(vec![1u32]) }))
            .await;

        let seen = Arc::new(Mutex::new(None));
        let seen_in_handler = Arc::clone(&seen);
        let mutation = exec
            .mutation::<u32>(ResourceKind::Tire, Operation::Create)
            .invalidates(Invalidation::Lists(ResourceKind::Tire))
            .success_message("Tire created successfully")
            .on_success(move |v| *seen_in_handler.lock().unwrap() = Some(*v));
        let mut status = mutation.subscribe();

        let result = mutation.execute(async { Ok(7u32) }).await;

        assert_eq!(result, Ok(7));
        assert_eq!(*seen.lock().unwrap(), Some(7));
        assert_eq!(*status.borrow_and_update(), MutationStatus::Success);
        assert!(exec.cache().observe::<Vec<u32>>(&key).is_stale);

        let notices = exec.notifier().active();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Tire created successfully");
    }

    #[tokio::test]
    async fn test_error_goes_to_notifier_by_default() {
        let exec = executor();
        let result = exec
            .mutation::<u32>(ResourceKind::Tire, Operation::Create)
            .execute(async { Err(create_failure()) })
            .await;

        assert_eq!(result.unwrap_err().to_string(), "Failed to create tire");
        let notices = exec.notifier().active();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Failed to create tire");
    }

    #[tokio::test]
    async fn test_custom_error_handler_replaces_notice() {
        let exec = executor();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let result = exec
            .mutation::<u32>(ResourceKind::Tire, Operation::Create)
            .on_error(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .execute(async { Err(create_failure()) })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(exec.notifier().active().is_empty());
    }

    #[tokio::test]
    async fn test_failure_does_not_invalidate() {
        let exec = executor();
        let key = QueryKey::list(ResourceKind::Tire, &ListParams::new());
        exec.cache()
            .query(key.clone(), fetcher(|| async { Ok(1u32) }))
            .await;

        let _ = exec
            .mutation::<u32>(ResourceKind::Tire, Operation::Create)
            .invalidates(Invalidation::All)
            .execute(async { Err(create_failure()) })
            .await;

        assert!(!exec.cache().observe::<u32>(&key).is_stale);
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let exec = executor();
        let (release, wait) = tokio::sync::oneshot::channel::<()>();
        let bound = exec
            .mutation::<u32>(ResourceKind::Order, Operation::Cancel)
            .bind(async move {
                let _ = wait.await;
                Ok(1)
            });
        let mut status = bound.subscribe();
        assert_eq!(bound.status(), MutationStatus::Idle);

        let task = tokio::spawn(bound.into_future());
        status.changed().await.unwrap();
        assert_eq!(*status.borrow_and_update(), MutationStatus::Pending);

        release.send(()).unwrap();
        assert_eq!(task.await.unwrap(), Ok(1));
        assert_eq!(*status.borrow(), MutationStatus::Success);
        assert!(status.borrow().is_terminal());
    }
}
