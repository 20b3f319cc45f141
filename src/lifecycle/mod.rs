//! Startup, configuration, teardown and the purchase workflow.

pub mod checkout;
pub mod config;
pub mod storefront;
pub mod tracing;

pub use checkout::{Checkout, CheckoutError, CheckoutOrchestrator};
pub use config::{ApiConfig, ConfigError, NoticeConfig, StorefrontConfig};
pub use storefront::Storefront;
pub use self::tracing::setup_tracing;
