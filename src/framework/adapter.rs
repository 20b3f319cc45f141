//! # Generic Resource Adapter
//!
//! `ResourceAdapter<R>` turns one resource operation into exactly one HTTP call:
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | `create`  | POST   | `{base}` |
//! | `update`  | PATCH  | `{base}/{id}` |
//! | `remove`  | DELETE | `{base}/{id}` |
//! | `get_one` | GET    | `{base}/{id}` |
//! | `list`    | GET    | `{base}?params` |
//!
//! Any failure (encoding, transport, status, decoding) is wrapped into an [`AdapterError`]
//! carrying the operation's fixed message and the original cause.
//!
//! Domain clients in [`crate::clients`] wrap this type and decide which operations a
//! resource actually exposes.

use crate::framework::error::{AdapterError, TransportError};
use crate::framework::params::ListParams;
use crate::framework::resource::{Operation, Resource, ResourceKind};
use crate::framework::transport::{ApiRequest, IntoRequestBody, Method, RequestBody, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Acknowledgement returned by delete endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ack {
    pub message: Option<String>,
}

impl Ack {
    /// Accepts `null`, a bare string, or an object with a `message` field.
    pub fn from_payload(payload: Value) -> Self {
        let message = match payload {
            Value::String(text) => Some(text),
            Value::Object(map) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };
        Self { message }
    }
}

/// Type-safe HTTP mapping for one resource family.
///
/// Cheap to clone: it only holds a shared handle to the transport.
pub struct ResourceAdapter<R: Resource> {
    transport: Arc<dyn Transport>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceAdapter<R> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceAdapter<R> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    /// Path of a single record: `{base}/{id}`.
    pub fn record_path(&self, id: &R::Id) -> String {
        format!("{}/{}", R::KIND.base_path(), id)
    }

    pub async fn create(&self, params: R::Create) -> Result<R, AdapterError> {
        let body = params.into_body().map_err(|e| self.wrap(Operation::Create, e))?;
        let request = ApiRequest::post(R::KIND.base_path()).with_body(body);
        self.call(Operation::Create, request).await
    }

    pub async fn update(&self, id: &R::Id, params: R::Update) -> Result<R, AdapterError> {
        let body = params.into_body().map_err(|e| self.wrap(Operation::Update, e))?;
        let request = ApiRequest::patch(self.record_path(id)).with_body(body);
        self.call(Operation::Update, request).await
    }

    pub async fn remove(&self, id: &R::Id) -> Result<Ack, AdapterError> {
        let request = ApiRequest::delete(self.record_path(id));
        let payload: Value = self.call(Operation::Remove, request).await?;
        Ok(Ack::from_payload(payload))
    }

    pub async fn get_one(&self, id: &R::Id) -> Result<R, AdapterError> {
        let request = ApiRequest::get(self.record_path(id));
        self.call(Operation::GetOne, request).await
    }

    pub async fn list(&self, params: &ListParams) -> Result<Vec<R>, AdapterError> {
        let request = ApiRequest::get(R::KIND.base_path()).with_query(params.pairs());
        self.call(Operation::List, request).await
    }

    /// Send a JSON body to a custom endpoint (state transitions, payment intents).
    pub async fn json_call<T, B>(
        &self,
        operation: Operation,
        method: Method,
        path: impl Into<String>,
        body: &B,
    ) -> Result<T, AdapterError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = RequestBody::json(body).map_err(|e| self.wrap(operation, e))?;
        let request = ApiRequest::new(method, path).with_body(body);
        self.call(operation, request).await
    }

    /// Send a request and decode the payload, tagging any failure with `operation`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: ApiRequest,
    ) -> Result<T, AdapterError> {
        let resource = R::KIND;
        debug!(%resource, ?operation, method = %request.method, path = %request.path, "Sending request");

        let outcome = match self.transport.send(request).await {
            Ok(response) => response.decode::<T>(),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(value) => {
                info!(%resource, ?operation, "Request ok");
                Ok(value)
            }
            Err(cause) => {
                let err = self.wrap(operation, cause);
                warn!(%resource, ?operation, error = %err, cause = %err.cause, "Request failed");
                Err(err)
            }
        }
    }

    fn wrap(&self, operation: Operation, cause: TransportError) -> AdapterError {
        AdapterError::new(R::KIND, operation, cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ack_from_payload() {
        assert_eq!(Ack::from_payload(Value::Null), Ack::default());
        assert_eq!(
            Ack::from_payload(json!({ "message": "Tire deleted" })).message.as_deref(),
            Some("Tire deleted")
        );
        assert_eq!(
            Ack::from_payload(json!("deleted")).message.as_deref(),
            Some("deleted")
        );
    }
}
