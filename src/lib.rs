//! # Storefront Sync
//!
//! > **The client-side data layer of a tires & wheels storefront.**
//!
//! This crate sits between presentation code and the storefront's REST API. It caches reads,
//! tracks writes, invalidates what a write makes stale, relays success and failure to the
//! user, and sequences the checkout workflow (order → payment intent → status → cancel).
//!
//! ## 🏗️ Design Notes
//!
//! ### Typed resources
//! Every record type implements [`Resource`](framework::Resource), which pins its id type and
//! its create/update payloads. A single generic [`ResourceAdapter`](framework::ResourceAdapter)
//! maps operations to HTTP calls for all of them.
//!
//! ### Backend-authoritative state
//! Nothing is updated optimistically. Local state changes only after the backend answers,
//! and the affected cache entries are then marked stale.
//!
//! ### Errors keep their cause
//! [`AdapterError`](framework::AdapterError) displays a fixed message ("Failed to create
//! tire") and carries the underlying [`TransportError`](framework::TransportError), status
//! code included.
//!
//! ### Observability
//! `tracing` everywhere, with `resource` / `operation` fields. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Transport, generic adapter, query cache, mutation executor, notifier, mock transport.
//!
//! ### 2. The Interface ([`clients`], [`model`])
//! One client per resource, exposing exactly the operations the API offers for it.
//!
//! ### 3. The Entry Points ([`services`], [`lifecycle`])
//! - [`CatalogService`](services::CatalogService) and [`OrderService`](services::OrderService):
//!   cached queries and tracked mutations.
//! - [`CheckoutOrchestrator`](lifecycle::CheckoutOrchestrator): the purchase workflow.
//! - [`Storefront`](lifecycle::Storefront): the context object that owns all of it.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! STOREFRONT_API_URL=http://localhost:4000/api RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod services;
