//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Requests**: method and path of every call (`debug`), HTTP error statuses (`warn`)
//! - **Resource Operations**: `resource` and `operation` fields on success (`info`) and
//!   failure (`warn`, with the transport `cause`)
//! - **Query Cache**: hits, joins of in-flight fetches, invalidations (`debug`)
//! - **Mutations**: pending and settled, with the number of invalidated entries
//! - **Notices**: every success/error notice, mirrored into the log
//!
//! ## Usage Examples
//!
//! ```bash
//! # Operations and notices only
//! RUST_LOG=info cargo run
//!
//! # Cache decisions and payload sizes
//! RUST_LOG=debug cargo run
//!
//! # Only the cache
//! RUST_LOG=storefront_sync::framework::cache=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a checkout reads roughly:
//!
//! ```text
//! DEBUG checkout: Mutation pending resource=order operation=Create
//! DEBUG checkout: Sending request resource=order operation=Create method=POST path=/order
//! INFO  checkout: Request ok resource=order operation=Create
//! INFO  checkout: Mutation succeeded resource=order operation=Create invalidated=0
//! INFO  checkout: Success notice notice=Order created successfully
//! INFO  checkout: Order persisted order_id=o_1 status=PENDING
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Structured fields carry resource/operation already
        .compact()
        .init();
}
