//! Generic data-sync framework for REST resources.
//!
//! This module provides the building blocks the storefront clients and services are made of.
//!
//! # Main Components
//!
//! - [`Transport`] - The HTTP seam ([`HttpTransport`] in production)
//! - [`Resource`] - Trait that record types implement to get an adapter
//! - [`ResourceAdapter`] - Generic one-call-per-operation adapter
//! - [`QueryCache`] - Deduplicating, invalidation-aware read cache
//! - [`Mutation`] - Single-use tracked write with completion handlers
//! - [`Notifier`] - Transient user-facing notices
//! - [`AdapterError`] / [`TransportError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for a scripted [`Transport`] that needs no server.

pub mod adapter;
pub mod cache;
pub mod error;
pub mod mock;
pub mod mutation;
pub mod notify;
pub mod params;
pub mod resource;
pub mod transport;

// Re-export core types for convenience
pub use adapter::{Ack, ResourceAdapter};
pub use cache::{fetcher, Fetcher, Invalidation, Query, QueryCache, QueryKey, QueryScope, QueryStatus};
pub use error::{AdapterError, TransportError};
pub use mutation::{BoundMutation, Mutation, MutationExecutor, MutationStatus};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use params::ListParams;
pub use resource::{Operation, Resource, ResourceKind};
pub use transport::{
    ApiRequest, ApiResponse, FormData, HttpTransport, HttpTransportBuilder, IntoRequestBody,
    Method, RequestBody, Transport, Upload,
};
