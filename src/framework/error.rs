//! # Framework Errors
//!
//! Two layers of failure flow through the crate:
//!
//! - [`TransportError`]: what went wrong on the wire (network, timeout, non-2xx status, bad body).
//! - [`AdapterError`]: a transport failure wrapped with the fixed, user-facing message of the
//!   operation that triggered it (e.g. "Failed to create tire").
//!
//! The original [`TransportError`] is always kept as the `cause` of an [`AdapterError`] and is
//! reachable through [`std::error::Error::source`], so callers can still tell a 404 apart from
//! a dead server.
//!
//! Both types are `Clone` so that a single settled result can be handed to every observer of a
//! shared in-flight query.

use crate::framework::resource::{Operation, ResourceKind};
use thiserror::Error;

/// Errors raised by a [`Transport`](crate::framework::Transport) implementation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// The request never produced a response (DNS, connection refused, TLS...).
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request body could not be encoded.
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// The HTTP client could not be built from the supplied settings.
    #[error("Invalid client configuration: {0}")]
    Config(String),

    /// The background task driving the request stopped before producing a result.
    #[error("Request task interrupted: {0}")]
    Interrupted(String),
}

impl TransportError {
    /// The HTTP status code, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A transport failure tagged with the resource operation that caused it.
///
/// `Display` yields the fixed per-operation message, which is what gets shown to users.
/// The underlying cause is preserved for diagnostics.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct AdapterError {
    pub resource: ResourceKind,
    pub operation: Operation,
    message: String,
    #[source]
    pub cause: TransportError,
}

impl AdapterError {
    pub fn new(resource: ResourceKind, operation: Operation, cause: TransportError) -> Self {
        Self {
            resource,
            operation,
            message: operation.failure_message(resource),
            cause,
        }
    }

    /// The fixed user-facing message, e.g. "Failed to cancel order".
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status reported by the server, if any.
    pub fn status(&self) -> Option<u16> {
        self.cause.status()
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// True for 400 and 422 answers, which the backend uses for payload validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self.status(), Some(400) | Some(422))
    }
}
