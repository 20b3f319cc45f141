//! # Mock Transport
//!
//! Utilities for testing clients, services and the checkout flow without a server.
//!
//! Queue expectations with [`MockTransport::expect`], hand the transport to the code under
//! test, then call [`MockTransport::verify`] to assert every expectation was consumed.
//!
//! # Example
//! ```ignore
//! let mock = MockTransport::new();
//! mock.expect(Method::Post, "/order").return_json(json!({ "id": "o_1", "status": "PENDING" }));
//! mock.expect(Method::Get, "/tires").return_status(500, "boom");
//!
//! let transport: Arc<dyn Transport> = Arc::new(mock.clone());
//! // Use transport in tests...
//! mock.verify();
//! ```

use crate::framework::error::TransportError;
use crate::framework::transport::{ApiRequest, ApiResponse, Method, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

struct Expectation {
    method: Method,
    path: String,
    delay: Option<Duration>,
    response: Result<ApiResponse, TransportError>,
}

#[derive(Default)]
struct State {
    expectations: VecDeque<Expectation>,
    calls: Vec<ApiRequest>,
}

/// In-memory [`Transport`] answering from a queue of expectations.
///
/// Requests are matched against the first queued expectation with the same method and path.
/// A request with no matching expectation fails with [`TransportError::Network`] and is still
/// recorded in [`calls`](MockTransport::calls).
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Expects one request with this method and path.
    pub fn expect(&self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            delay: None,
            state: Arc::clone(&self.state),
        }
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Requests received for this method and path.
    pub fn calls_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.lock()
            .calls
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.lock().expectations.len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.expectations.is_empty() {
            let pending: Vec<String> = state
                .expectations
                .iter()
                .map(|e| format!("{} {}", e.method, e.path))
                .collect();
            panic!(
                "Not all expectations were met. {} remaining: {}",
                pending.len(),
                pending.join(", ")
            );
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let matched = {
            let mut state = self.lock();
            state.calls.push(request.clone());
            let position = state
                .expectations
                .iter()
                .position(|e| e.method == request.method && e.path == request.path);
            position.and_then(|i| state.expectations.remove(i))
        };

        let Some(expectation) = matched else {
            return Err(TransportError::Network(format!(
                "unexpected request: {} {}",
                request.method, request.path
            )));
        };

        if let Some(delay) = expectation.delay {
            tokio::time::sleep(delay).await;
        }
        expectation.response
    }
}

/// Builder for a single expectation. Nothing is queued until a `return_*` method is called.
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    delay: Option<Duration>,
    state: Arc<Mutex<State>>,
}

impl ExpectationBuilder {
    /// Hold the response back for `delay` (to keep a query in flight).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer 200 with this JSON body.
    pub fn return_json(self, body: Value) {
        self.push(Ok(ApiResponse::new(200, body)));
    }

    /// Answer with a non-2xx status and server message.
    pub fn return_status(self, status: u16, message: impl Into<String>) {
        self.push(Err(TransportError::Status {
            status,
            message: message.into(),
        }));
    }

    /// Fail with an arbitrary transport error.
    pub fn return_err(self, err: TransportError) {
        self.push(Err(err));
    }

    fn push(self, response: Result<ApiResponse, TransportError>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.expectations.push_back(Expectation {
            method: self.method,
            path: self.path,
            delay: self.delay,
            response,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_matches_by_method_and_path() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, "/tires").return_json(json!([]));
        mock.expect(Method::Post, "/tires").return_json(json!({ "id": "t1" }));

        let created = mock.send(ApiRequest::post("/tires")).await.unwrap();
        assert_eq!(created.body, json!({ "id": "t1" }));
        let listed = mock.send(ApiRequest::get("/tires")).await.unwrap();
        assert_eq!(listed.body, json!([]));

        assert_eq!(mock.call_count(), 2);
        mock.verify();
    }

    #[tokio::test]
    async fn test_unexpected_request_is_an_error() {
        let mock = MockTransport::new();
        let result = mock.send(ApiRequest::delete("/order/o_1")).await;
        assert!(matches!(result, Err(TransportError::Network(_))));
        assert_eq!(mock.calls_to(Method::Delete, "/order/o_1").len(), 1);
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_panics_on_leftovers() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, "/categories").return_json(json!([]));
        mock.verify();
    }
}
